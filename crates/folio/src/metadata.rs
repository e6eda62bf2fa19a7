// File: src/metadata.rs
// Purpose: Per-request routing metadata exposed to the client as window.route

use folio_router::ResolvedMatch;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Resolution results and preloaded data for one page request
///
/// Serialised as `{"data": ..., "path": ..., "match": ...}`; absent fields
/// are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMetadata {
    pub data: Map<String, JsonValue>,

    #[serde(rename = "path", skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,

    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub wildcard_value: Option<String>,
}

impl PageMetadata {
    pub fn from_match(found: &ResolvedMatch) -> Self {
        Self {
            data: Map::new(),
            resolved_path: Some(found.file_path.clone()),
            wildcard_value: found.wildcard_value.clone(),
        }
    }

    pub fn with_data(mut self, data: Map<String, JsonValue>) -> Self {
        self.data = data;
        self
    }

    /// JSON form, same shape as the `Serialize` impl
    pub fn to_value(&self) -> JsonValue {
        let mut out = Map::new();
        out.insert("data".to_string(), JsonValue::Object(self.data.clone()));
        if let Some(path) = &self.resolved_path {
            out.insert("path".to_string(), JsonValue::String(path.clone()));
        }
        if let Some(value) = &self.wildcard_value {
            out.insert("match".to_string(), JsonValue::String(value.clone()));
        }
        JsonValue::Object(out)
    }

    /// `<script>` tag assigning the metadata to `window.route`
    ///
    /// `<` is written as `\u003c` so data containing `</script>` cannot end
    /// the tag early.
    pub fn to_script(&self) -> String {
        let json = self.to_value().to_string().replace('<', "\\u003c");
        format!("<script>window.route = {}</script>", json)
    }
}
