//! JSON endpoints: handler modules, the module registry, and the invoker
//!
//! A handler module is a set of method functions (`get`, `post`, ...) living
//! at a route key such as `api/users/[slug].json`. Modules are either
//! registered from Rust code or loaded from a JSON definition file of the
//! same name under the routes directory.

use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request_context::QueryParams;

pub mod definition;
pub mod invoker;
pub mod registry;

pub use definition::HandlerDefinition;
pub use invoker::EndpointInvoker;
pub use registry::HandlerRegistry;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One exported method of a handler module
pub type MethodFn =
    Arc<dyn Fn(EndpointRequest) -> BoxFuture<'static, anyhow::Result<EndpointResult>> + Send + Sync>;

/// Name under which the wildcard value is exposed to handlers
pub const SLUG_PARAM: &str = "slug";

/// What a handler method sees of the request
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub body: JsonValue,
    pub headers: HashMap<String, String>,
    /// Route parameters; the wildcard value lives under `"slug"`
    pub params: HashMap<String, String>,
}

impl EndpointRequest {
    /// A bodiless GET, as issued by `@data` directives
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: QueryParams::default(),
            body: json!({}),
            headers: HashMap::new(),
            params: HashMap::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The wildcard value captured during resolution
    pub fn slug(&self) -> Option<&str> {
        self.param(SLUG_PARAM)
    }
}

/// What a handler method returns
///
/// Also the shape of each method entry in a JSON handler definition, so
/// omitted fields take the same defaults in both places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointResult {
    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default = "empty_object")]
    pub body: JsonValue,

    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_status() -> u16 {
    200
}

fn empty_object() -> JsonValue {
    json!({})
}

impl Default for EndpointResult {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: empty_object(),
            headers: HashMap::new(),
        }
    }
}

impl EndpointResult {
    /// 200 with the given body
    pub fn ok(body: JsonValue) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    /// The 404 shared by unknown routes and unsupported methods
    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: json!({ "error": "Not Found" }),
            headers: HashMap::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A handler definition: method functions keyed by lowercase method name
#[derive(Clone, Default)]
pub struct HandlerModule {
    methods: HashMap<String, MethodFn>,
}

impl std::fmt::Debug for HandlerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("HandlerModule")
            .field("methods", &methods)
            .finish()
    }
}

impl HandlerModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `handler` under `method` (case-insensitive)
    pub fn on<F, Fut>(mut self, method: &str, handler: F) -> Self
    where
        F: Fn(EndpointRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<EndpointResult>> + Send + 'static,
    {
        let method_fn: MethodFn = Arc::new(
            move |req: EndpointRequest| -> BoxFuture<'static, anyhow::Result<EndpointResult>> {
                Box::pin(handler(req))
            },
        );
        self.insert(method, method_fn);
        self
    }

    pub fn get<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(EndpointRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<EndpointResult>> + Send + 'static,
    {
        self.on("get", handler)
    }

    pub fn post<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(EndpointRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<EndpointResult>> + Send + 'static,
    {
        self.on("post", handler)
    }

    pub fn put<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(EndpointRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<EndpointResult>> + Send + 'static,
    {
        self.on("put", handler)
    }

    pub fn delete<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(EndpointRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<EndpointResult>> + Send + 'static,
    {
        self.on("delete", handler)
    }

    /// Look up an exported method by lowercase name
    pub fn method(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    pub fn insert(&mut self, method: &str, handler: MethodFn) {
        self.methods.insert(method.to_ascii_lowercase(), handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_defaults() {
        let result: EndpointResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, EndpointResult::default());
        assert_eq!(result.status, 200);
        assert_eq!(result.body, json!({}));
        assert!(result.headers.is_empty());
    }

    #[test]
    fn test_not_found_shape() {
        let result = EndpointResult::not_found();
        assert_eq!(result.status, 404);
        assert_eq!(result.body, json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn test_module_methods_are_lowercase() {
        let module = HandlerModule::new()
            .on("GET", |_req| async { anyhow::Ok(EndpointResult::ok(json!("hi"))) })
            .post(|req| async move { anyhow::Ok(EndpointResult::ok(req.body).with_status(201)) });

        assert!(module.method("get").is_some());
        assert!(module.method("GET").is_none());
        assert!(module.method("put").is_none());

        let post = module.method("post").unwrap();
        let mut req = EndpointRequest::get("/api/things");
        req.method = Method::POST;
        req.body = json!({"id": 1});
        let result = post(req).await.unwrap();
        assert_eq!(result.status, 201);
        assert_eq!(result.body, json!({"id": 1}));
    }

    #[test]
    fn test_request_slug() {
        let mut req = EndpointRequest::get("/api/users/5");
        assert_eq!(req.slug(), None);
        req.params.insert(SLUG_PARAM.to_string(), "5".to_string());
        assert_eq!(req.slug(), Some("5"));
    }
}
