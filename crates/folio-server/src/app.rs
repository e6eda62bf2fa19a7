// File: src/app.rs
// Purpose: Router assembly and shared application state

use axum::Router;
use folio::{Site, SiteConfig};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::dispatch;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
    pub config: Arc<SiteConfig>,
}

/// Build the axum router for `site`
///
/// Each static directory is mounted at `/<dir>` with `ServeDir`; every other
/// request reaches [`dispatch::handle`].
pub fn build_router(config: &SiteConfig, site: Site) -> Router {
    let state = AppState {
        site: Arc::new(site),
        config: Arc::new(config.clone()),
    };

    let router = config
        .static_dirs
        .iter()
        .filter(|dir| !dir.is_empty() && !dir.contains('/'))
        .fold(Router::new(), |router, dir| {
            let on_disk = config.root.join(dir);
            debug!("Static directory /{} -> {:?}", dir, on_disk);
            router.nest_service(&format!("/{}", dir), ServeDir::new(on_disk))
        });

    router
        .fallback(dispatch::handle)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
