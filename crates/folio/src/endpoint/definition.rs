// File: src/endpoint/definition.rs
// Purpose: Declarative handler modules stored as JSON files under routes/

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::{BoxFuture, EndpointRequest, EndpointResult, HandlerModule, MethodFn};
use crate::error::{FolioError, Result};

/// Token replaced with the wildcard value inside definition strings
pub const SLUG_TOKEN: &str = "%slug%";

/// A JSON handler definition
///
/// ```json
/// {
///   "get":  { "status": 200, "body": { "id": "%slug%" } },
///   "post": { "status": 201 }
/// }
/// ```
///
/// Each top-level key is a method name; each value is the result that method
/// returns. `%slug%` in any string of the body or headers becomes the
/// wildcard value captured for the request (empty on literal matches).
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct HandlerDefinition {
    methods: HashMap<String, EndpointResult>,
}

impl HandlerDefinition {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read and parse a definition file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| FolioError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text).map_err(|source| FolioError::HandlerDefinition {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Turn every entry into a method function of a module
    pub fn into_module(self) -> HandlerModule {
        self.methods
            .into_iter()
            .fold(HandlerModule::new(), |mut module, (method, template)| {
                let template = Arc::new(template);
                let method_fn: MethodFn = Arc::new(
                    move |req: EndpointRequest| -> BoxFuture<'static, anyhow::Result<EndpointResult>> {
                        let result = fill_result(&template, req.slug().unwrap_or(""));
                        Box::pin(async move { anyhow::Ok(result) })
                    },
                );
                module.insert(&method, method_fn);
                module
            })
    }
}

fn fill_result(template: &EndpointResult, slug: &str) -> EndpointResult {
    EndpointResult {
        status: template.status,
        body: fill_slug(&template.body, slug),
        headers: template
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.replace(SLUG_TOKEN, slug)))
            .collect(),
    }
}

/// Copy of `value` with the slug token replaced in every string
fn fill_slug(value: &JsonValue, slug: &str) -> JsonValue {
    match value {
        JsonValue::String(s) => JsonValue::String(s.replace(SLUG_TOKEN, slug)),
        JsonValue::Array(items) => items.iter().map(|v| fill_slug(v, slug)).collect(),
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), fill_slug(v, slug)))
                .collect(),
        ),
        other => other.clone(),
    }
}
