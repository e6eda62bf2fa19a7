// File: src/template_loader.rs
// Purpose: Expands @template directives with partials from the templates/ directory

use folio_router::split_segments;
use regex::Captures;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

use crate::directive::TEMPLATE_DIRECTIVE;

/// Extension of partial files
pub const PARTIAL_EXTENSION: &str = "html";

/// Replaces `<!-- @template NAME -->` with `templates/NAME.html`
///
/// Partials are read from disk on every call. Expansion is a single pass:
/// directives inside an inserted partial are left as they are.
#[derive(Debug, Clone)]
pub struct TemplateCompositor {
    templates_dir: PathBuf,
}

impl TemplateCompositor {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Location of a partial, or `None` if the name could leave the directory
    pub fn partial_path(&self, name: &str) -> Option<PathBuf> {
        let segments = split_segments(name)?;
        let (file, dirs) = segments.split_last()?;
        let path = dirs
            .iter()
            .fold(self.templates_dir.clone(), |path, dir| path.join(dir));
        Some(path.join(format!("{}.{}", file, PARTIAL_EXTENSION)))
    }

    /// Read a partial; a missing or unreadable partial reads as `None`
    pub fn load_partial(&self, name: &str) -> Option<String> {
        let path = self.partial_path(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read partial {:?}: {}", path, e);
                None
            }
        }
    }

    /// Expand every `@template` directive in `content`
    pub fn composite(&self, content: &str) -> String {
        TEMPLATE_DIRECTIVE
            .replace_all(content, |caps: &Captures| {
                self.load_partial(caps[1].trim()).unwrap_or_default()
            })
            .into_owned()
    }
}
