//! reelscout MCP server entry point.
//!
//! Boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use reelscout_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        cache = %config.cache_path.display(),
        catalog = %config.db_path.display(),
        "Starting reelscout server on stdio transport"
    );

    let state = state::AppState::open(&config).await?;
    let handler = handler::ReelscoutServer::new(state);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}
