// File: src/preload.rs
// Purpose: Run @data directives concurrently and collect their bodies

use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::directive::{data_bindings, DATA_DIRECTIVE};
use crate::endpoint::EndpointInvoker;
use crate::error::{FolioError, Result};

/// Page content with its data directives removed, plus the data they bound
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preloaded {
    pub content: String,
    pub data: Map<String, JsonValue>,
}

/// Issues every `@data` GET of a page at once and waits for all of them
#[derive(Debug, Clone)]
pub struct DataPreloader {
    invoker: EndpointInvoker,
}

impl DataPreloader {
    pub fn new(invoker: EndpointInvoker) -> Self {
        Self { invoker }
    }

    /// Strip `@data` directives from `content` and invoke each one
    ///
    /// The body of each response is bound under the directive's name
    /// whatever its status. Bindings are applied in completion order, so
    /// with duplicate names the slowest call wins. Every call is driven to
    /// completion before this returns; if any failed, the first failure
    /// observed is returned and the bound data is dropped.
    pub async fn preload(&self, content: &str) -> Result<Preloaded> {
        let bindings = data_bindings(content);
        let stripped = DATA_DIRECTIVE.replace_all(content, "").into_owned();

        let mut pending: FuturesUnordered<_> = bindings
            .into_iter()
            .map(|binding| {
                let invoker = self.invoker.clone();
                async move {
                    let result = invoker.get(&binding.path).await;
                    (binding, result)
                }
            })
            .collect();

        let mut data = Map::new();
        let mut failure: Option<FolioError> = None;

        while let Some((binding, result)) = pending.next().await {
            match result {
                Ok(response) => {
                    debug!("@data {} <- {} ({})", binding.name, binding.path, response.status);
                    data.insert(binding.name, response.body);
                }
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(Preloaded {
                content: stripped,
                data,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{EndpointResult, HandlerModule, HandlerRegistry};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn preloader(registry: HandlerRegistry) -> DataPreloader {
        DataPreloader::new(EndpointInvoker::new(registry))
    }

    #[tokio::test]
    async fn test_binds_body_and_strips_directive() {
        let registry = HandlerRegistry::new("does-not-exist").with(
            "api/users/[slug].json",
            HandlerModule::new().get(|req| async move {
                anyhow::Ok(EndpointResult::ok(json!({ "name": "Ann", "id": req.slug() })))
            }),
        );

        let out = preloader(registry)
            .preload("<!-- @data user /api/users/5 --><p>{{user.name}}</p>")
            .await
            .unwrap();

        assert_eq!(out.content, "<p>{{user.name}}</p>");
        assert_eq!(out.data["user"], json!({"name": "Ann", "id": "5"}));
    }

    #[tokio::test]
    async fn test_not_found_body_is_bound() {
        let out = preloader(HandlerRegistry::new("does-not-exist"))
            .preload("<!-- @data missing /api/nothing -->")
            .await
            .unwrap();
        assert_eq!(out.content, "");
        assert_eq!(out.data["missing"], json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn test_no_directives() {
        let out = preloader(HandlerRegistry::new("does-not-exist"))
            .preload("<p>static</p>")
            .await
            .unwrap();
        assert_eq!(out.content, "<p>static</p>");
        assert!(out.data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_names_last_completed_wins() {
        let registry = HandlerRegistry::new("does-not-exist")
            .with(
                "api/slow.json",
                HandlerModule::new().get(|_req| async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    anyhow::Ok(EndpointResult::ok(json!("slow")))
                }),
            )
            .with(
                "api/fast.json",
                HandlerModule::new().get(|_req| async {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    anyhow::Ok(EndpointResult::ok(json!("fast")))
                }),
            );

        let out = preloader(registry)
            .preload("<!-- @data x /api/slow --><!-- @data x /api/fast -->")
            .await
            .unwrap();
        assert_eq!(out.data["x"], json!("slow"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_waits_for_all_calls() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();

        let registry = HandlerRegistry::new("does-not-exist")
            .with(
                "api/fail.json",
                HandlerModule::new().get(|_req| async {
                    Err::<EndpointResult, _>(anyhow::anyhow!("backend down"))
                }),
            )
            .with(
                "api/slow.json",
                HandlerModule::new().get(move |_req| {
                    let counter = counter.clone();
                    async move {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                        anyhow::Ok(EndpointResult::default())
                    }
                }),
            );

        let err = preloader(registry)
            .preload("<!-- @data a /api/fail --><!-- @data b /api/slow -->")
            .await
            .unwrap_err();

        assert!(matches!(err, FolioError::Handler { .. }));
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
