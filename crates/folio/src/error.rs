// File: src/error.rs
// Purpose: Failures that escape the page and endpoint pipelines

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the HTTP layer as a 500
///
/// Missing routes, missing methods, missing partials and missing placeholder
/// data are not errors; they degrade to a 404 or a blank substitution.
#[derive(Debug, Error)]
pub enum FolioError {
    /// A handler method returned an error
    #[error("handler {route} failed on {method}")]
    Handler {
        route: String,
        method: String,
        #[source]
        source: anyhow::Error,
    },

    /// A JSON handler definition exists but cannot be parsed
    #[error("malformed handler definition {path:?}")]
    HandlerDefinition {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A page, handler definition or layout could not be read
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = FolioError> = std::result::Result<T, E>;
