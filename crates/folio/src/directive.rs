// File: src/directive.rs
// Purpose: Directive grammar (@template, @data, {{placeholder}})

use once_cell::sync::Lazy;
use regex::Regex;

/// `<!-- @template NAME -->`
pub static TEMPLATE_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!-- @template (.+?) -->").unwrap());

/// `<!-- @data NAME PATH -->`, NAME is letters only
pub static DATA_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!-- @data ([a-zA-Z]+) (.+?) -->").unwrap());

/// `{{key.path}}`, shortest match so two placeholders on a line stay apart
pub static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap());

/// A `@data` directive: bind the GET result of `path` to `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBinding {
    pub name: String,
    pub path: String,
}

/// `@data` bindings in document order
pub fn data_bindings(content: &str) -> Vec<DataBinding> {
    DATA_DIRECTIVE
        .captures_iter(content)
        .map(|caps| DataBinding {
            name: caps[1].to_string(),
            path: caps[2].trim().to_string(),
        })
        .collect()
}
