// File: src/renderer.rs
// Purpose: Substitute {{placeholders}} against the page data map

use regex::Captures;
use serde_json::{Map, Value as JsonValue};

use crate::directive::PLACEHOLDER;
use crate::value::{display, lookup, Lookup};

/// Resolves `{{key.path}}` markers against preloaded page data
pub struct Renderer<'a> {
    data: &'a Map<String, JsonValue>,
    fallback: &'a str,
}

impl<'a> Renderer<'a> {
    /// Missing keys render as the empty string
    pub fn new(data: &'a Map<String, JsonValue>) -> Self {
        Self { data, fallback: "" }
    }

    /// Missing keys render as `fallback`
    pub fn with_fallback(mut self, fallback: &'a str) -> Self {
        self.fallback = fallback;
        self
    }

    /// Replace every placeholder in `content`
    ///
    /// Values substituted in are not scanned again.
    pub fn render(&self, content: &str) -> String {
        PLACEHOLDER
            .replace_all(content, |caps: &Captures| match lookup(self.data, caps[1].trim()) {
                Lookup::Found(value) => display(value).into_owned(),
                Lookup::Missing => self.fallback.to_string(),
            })
            .into_owned()
    }
}

/// Substitute placeholders, rendering missing keys as `""`
pub fn substitute(content: &str, data: &Map<String, JsonValue>) -> String {
    Renderer::new(data).render(content)
}

/// Substitute placeholders, rendering missing keys as `fallback`
pub fn substitute_with(content: &str, data: &Map<String, JsonValue>, fallback: &str) -> String {
    Renderer::new(data).with_fallback(fallback).render(content)
}
