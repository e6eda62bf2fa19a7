// File: src/endpoint/invoker.rs
// Purpose: Resolve a handler path and dispatch by HTTP method

use std::sync::Arc;
use tracing::debug;

use super::{EndpointRequest, EndpointResult, HandlerRegistry, SLUG_PARAM};
use crate::error::{FolioError, Result};

/// Dispatches requests to handler modules
///
/// Cheap to clone; every clone shares the same registry.
#[derive(Debug, Clone)]
pub struct EndpointInvoker {
    registry: Arc<HandlerRegistry>,
}

impl EndpointInvoker {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Invoke the handler for `request.path` with `request.method`
    ///
    /// Unknown routes and unsupported methods both yield
    /// [`EndpointResult::not_found`]. A handler's own result is returned
    /// untouched; a handler error becomes [`FolioError::Handler`].
    pub async fn invoke(&self, mut request: EndpointRequest) -> Result<EndpointResult> {
        let route_path = strip_json_extension(&request.path);

        let Some(found) = self.registry.resolve(route_path) else {
            debug!("No handler for {}", request.path);
            return Ok(EndpointResult::not_found());
        };

        let Some(module) = self.registry.module(&found.file_path).await? else {
            return Ok(EndpointResult::not_found());
        };

        let method = request.method.as_str().to_ascii_lowercase();
        let Some(handler) = module.method(&method) else {
            debug!("{} does not export {}", found.file_path, method);
            return Ok(EndpointResult::not_found());
        };

        if let Some(slug) = found.wildcard_value {
            request.params.insert(SLUG_PARAM.to_string(), slug);
        }

        debug!("{} {} -> {}", request.method, request.path, found.file_path);

        handler(request)
            .await
            .map_err(|source| FolioError::Handler {
                route: found.file_path,
                method,
                source,
            })
    }

    /// GET `path` with an empty body and no headers
    pub async fn get(&self, path: &str) -> Result<EndpointResult> {
        self.invoke(EndpointRequest::get(path)).await
    }
}

/// `/api/users/5.json` and `/api/users/5` name the same handler
fn strip_json_extension(path: &str) -> &str {
    path.strip_suffix(".json").unwrap_or(path)
}
