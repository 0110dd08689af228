//! HTTP server for the question page.

use agri_qa::config::AppConfig;
use agri_qa::dataset::Tables;
use agri_qa::web;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let addr = config.bind_addr()?;

    // Tables are loaded once and shared read-only by every connection.
    let tables = Tables::load(&config.data_paths())
        .with_context(|| format!("Failed to load datasets from {}", config.data_dir.display()))?;
    let tables = Arc::new(tables);

    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    web::serve(listener, tables).await?;
    Ok(())
}
