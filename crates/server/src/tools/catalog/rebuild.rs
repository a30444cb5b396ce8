//! catalog_rebuild tool implementation.
//!
//! Drops the catalog and reloads it from every cached metadata response.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use reelscout_core::{Error, RebuildReport};

use crate::state::AppState;
use crate::tools::json_result;

pub async fn rebuild(state: &AppState) -> Result<RebuildReport, Error> {
    let cache = state.cache.lock().await;
    tracing::info!(entries = cache.len(), "rebuilding catalog");
    state.catalog.rebuild(&cache).await
}

/// Implementation of the catalog_rebuild tool.
pub async fn rebuild_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let report = rebuild(state).await?;
    json_result(&report)
}
