use anyhow::Result;
use folio::{Config, Site};
use folio_server::{build_router, shutdown_signal, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "folio=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::load_default()?,
    };
    config.apply_env()?;

    info!(
        "folio starting: root {:?}, routes {}, templates {}",
        config.site.root, config.site.routes_dir, config.site.templates_dir
    );

    let site = Site::from_config(&config.site);
    let app = build_router(&config.site, site);

    Server::bind(&config, app)
        .await?
        .serve_until(shutdown_signal())
        .await
}
