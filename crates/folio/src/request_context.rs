// File: src/request_context.rs
// Purpose: Per-request view of the incoming HTTP request

use axum::http::{HeaderMap, Method};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::config::SiteConfig;
use crate::endpoint::EndpointRequest;

/// How a request path is served, decided by its trailing extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// First segment names a static directory; served from disk
    Static,
    /// `.json` extension; dispatched to a handler
    Endpoint,
    /// No extension or `.html`; rendered through the page pipeline
    Page,
    /// Any other extension
    Unroutable,
}

/// An incoming request, immutable once built
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// Decoded request path
    pub pathname: String,

    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: Method,

    /// Query parameters from URL (?key=value)
    pub query: QueryParams,

    /// Parsed request body (`{}` when absent or unparseable)
    pub body: JsonValue,

    /// Request headers
    pub headers: HeaderMap,
}

impl RouteRequest {
    /// Create a new request
    pub fn new(
        method: Method,
        pathname: impl Into<String>,
        query: QueryParams,
        body: JsonValue,
        headers: HeaderMap,
    ) -> Self {
        Self {
            pathname: pathname.into(),
            method,
            query,
            body,
            headers,
        }
    }

    /// Extension of the last path segment, if any
    ///
    /// Only the final segment counts: `/v1.2/users` has no extension.
    pub fn extension(&self) -> Option<&str> {
        path_extension(&self.pathname)
    }

    /// Classify the request for dispatch
    pub fn kind(&self, site: &SiteConfig) -> RouteKind {
        if site.is_static(&self.pathname) {
            return RouteKind::Static;
        }

        match self.extension() {
            Some("json") => RouteKind::Endpoint,
            None | Some("html") => RouteKind::Page,
            Some(_) => RouteKind::Unroutable,
        }
    }

    /// Handler view of this request
    pub fn to_endpoint_request(&self) -> EndpointRequest {
        let headers = self
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        EndpointRequest {
            method: self.method.clone(),
            path: self.pathname.clone(),
            query: self.query.clone(),
            body: self.body.clone(),
            headers,
            params: HashMap::new(),
        }
    }
}

/// Extension of the last segment of `path`
///
/// Whatever follows the last `.` counts, so a dotfile such as `/.hidden`
/// has the extension `hidden`. A trailing `.` gives no extension.
pub fn path_extension(path: &str) -> Option<&str> {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Query parameters from URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Create from HashMap
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a query parameter value
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }
}
