// File: src/endpoint/registry.rs
// Purpose: Process-wide cache of handler modules

use folio_router::{resolve, FsSource, LookupRule, ResolvedMatch, RouteSource};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{HandlerDefinition, HandlerModule};
use crate::error::Result;

/// Handler modules keyed by route key (`api/users/[slug].json`)
///
/// Two kinds of module live here:
/// - **registered** modules, supplied in code before the server starts;
/// - **loaded** modules, parsed from a JSON definition file the first time
///   their route key is requested.
///
/// A loaded module is kept for the lifetime of the registry and never
/// invalidated: editing a definition file has no effect until restart.
/// Existence is still checked on disk for every resolution, so a deleted
/// file stops resolving immediately. Registered modules shadow files with
/// the same key.
#[derive(Debug)]
pub struct HandlerRegistry {
    files: FsSource,
    registered: HashMap<String, Arc<HandlerModule>>,
    loaded: RwLock<HashMap<String, Arc<HandlerModule>>>,
}

impl HandlerRegistry {
    /// Create a registry over the routes directory
    pub fn new(routes_dir: impl Into<PathBuf>) -> Self {
        Self {
            files: FsSource::new(routes_dir),
            registered: HashMap::new(),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// Register a module in code under `key`, e.g. `"api/users/[slug].json"`
    pub fn register(&mut self, key: &str, module: HandlerModule) {
        self.registered
            .insert(key.trim_start_matches('/').to_string(), Arc::new(module));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, key: &str, module: HandlerModule) -> Self {
        self.register(key, module);
        self
    }

    /// Resolve a handler path (without its `.json` extension)
    pub fn resolve(&self, pathname: &str) -> Option<ResolvedMatch> {
        resolve(self, pathname, &LookupRule::HANDLER)
    }

    /// Fetch the module for a resolved route key, loading it on first use
    ///
    /// `Ok(None)` means the key names neither a registered module nor a file.
    pub async fn module(&self, key: &str) -> Result<Option<Arc<HandlerModule>>> {
        if let Some(module) = self.registered.get(key) {
            return Ok(Some(module.clone()));
        }

        if let Some(module) = self.loaded.read().await.get(key) {
            return Ok(Some(module.clone()));
        }

        let path = self.files.path_of(key);
        if !path.is_file() {
            return Ok(None);
        }

        let module = Arc::new(HandlerDefinition::load(&path)?.into_module());
        debug!("Loaded handler definition: {} -> {:?}", key, path);

        // Another request may have loaded it meanwhile; keep the first copy
        let mut loaded = self.loaded.write().await;
        Ok(Some(loaded.entry(key.to_string()).or_insert(module).clone()))
    }

    /// Number of modules loaded from disk so far
    pub async fn loaded_count(&self) -> usize {
        self.loaded.read().await.len()
    }
}

impl RouteSource for HandlerRegistry {
    fn contains(&self, relative: &str) -> bool {
        self.registered.contains_key(relative) || self.files.contains(relative)
    }
}
