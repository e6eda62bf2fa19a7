//! HTTP front end for a folio site
//!
//! Requests under a static directory are served from disk. Everything else
//! falls through to a single handler that dispatches by extension: `.json`
//! to the endpoint invoker, no extension or `.html` to the page pipeline.

pub mod app;
pub mod dispatch;
pub mod lifecycle;

pub use app::{build_router, AppState};
pub use lifecycle::{shutdown_signal, Server};
