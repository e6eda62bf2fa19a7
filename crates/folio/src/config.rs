// File: src/config.rs
// Purpose: Configuration parsing from folio.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Site layout on disk
///
/// Every directory is relative to `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site root (default: ".")
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Pages and JSON handlers (default: "routes")
    #[serde(default = "default_routes_dir")]
    pub routes_dir: String,

    /// Partials included with `@template` (default: "templates")
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Shell wrapped around every page (default: "layout.html")
    #[serde(default = "default_layout_file")]
    pub layout_file: String,

    /// First path segments served straight from disk, bypassing routing
    #[serde(default = "default_static_dirs")]
    pub static_dirs: Vec<String>,
}

impl SiteConfig {
    pub fn routes_path(&self) -> PathBuf {
        self.root.join(&self.routes_dir)
    }

    pub fn templates_path(&self) -> PathBuf {
        self.root.join(&self.templates_dir)
    }

    pub fn layout_path(&self) -> PathBuf {
        self.root.join(&self.layout_file)
    }

    /// Whether a request path belongs to a static directory
    pub fn is_static(&self, pathname: &str) -> bool {
        let first = pathname
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("");
        self.static_dirs.iter().any(|dir| dir == first)
    }
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_routes_dir() -> String {
    "routes".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_layout_file() -> String {
    "layout.html".to_string()
}

fn default_static_dirs() -> Vec<String> {
    vec!["assets".to_string(), "templates".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            routes_dir: default_routes_dir(),
            templates_dir: default_templates_dir(),
            layout_file: default_layout_file(),
            static_dirs: default_static_dirs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./folio.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("folio.toml")
    }

    /// Apply `FOLIO_HOST`, `FOLIO_PORT` and `FOLIO_ROOT` from the environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("FOLIO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FOLIO_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("FOLIO_PORT is not a valid port: {:?}", port))?;
        }
        if let Some(root) = lookup("FOLIO_ROOT") {
            self.site.root = PathBuf::from(root);
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
