// File: src/layout.rs
// Purpose: Wrap rendered page content in the site layout shell

use maud::{html, PreEscaped, DOCTYPE};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::error::{FolioError, Result};
use crate::metadata::PageMetadata;

pub const BODY_MARKER: &str = "%body%";
pub const HEAD_MARKER: &str = "%head%";
pub const TITLE_MARKER: &str = "%title%";

/// A layout shell with `%body%`, `%head%` and `%title%` insertion points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shell: String,
}

impl Layout {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Read the shell from `path`, or use [`Layout::default_shell`] if the
    /// file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(shell) => Ok(Self::new(shell)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No layout at {:?}, using the default shell", path);
                Ok(Self::default_shell())
            }
            Err(source) => Err(FolioError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Minimal HTML document carrying all three markers
    pub fn default_shell() -> Self {
        let markup = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (PreEscaped(TITLE_MARKER)) }
                    (PreEscaped(HEAD_MARKER))
                }
                body { (PreEscaped(BODY_MARKER)) }
            }
        };
        Self::new(markup.into_string())
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Fill the markers in one pass over the shell
    ///
    /// Only the first occurrence of each marker is replaced, and text coming
    /// from `body`, the metadata or the title is never searched for markers.
    pub fn assemble(&self, body: &str, metadata: &PageMetadata, title: Option<&str>) -> String {
        let head = metadata.to_script();
        let title = title
            .map(|t| html! { (t) }.into_string())
            .unwrap_or_default();

        let mut inserts: Vec<(usize, &str, &str)> = [
            (BODY_MARKER, body),
            (HEAD_MARKER, head.as_str()),
            (TITLE_MARKER, title.as_str()),
        ]
        .into_iter()
        .filter_map(|(marker, value)| self.shell.find(marker).map(|at| (at, marker, value)))
        .collect();
        inserts.sort_by_key(|(at, _, _)| *at);

        let mut out = String::with_capacity(self.shell.len() + body.len() + head.len());
        let mut cursor = 0;
        for (at, marker, value) in inserts {
            if at < cursor {
                continue;
            }
            out.push_str(&self.shell[cursor..at]);
            out.push_str(value);
            cursor = at + marker.len();
        }
        out.push_str(&self.shell[cursor..]);
        out
    }
}
