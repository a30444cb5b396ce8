//! MCP tool implementations.
//!
//! Each tool has a typed core that tests call directly and an `*_impl`
//! wrapper that renders its output as pretty JSON text content.

pub mod cache;
pub mod catalog;
pub mod movie_search;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use reelscout_core::Error;
use serde::Serialize;

/// Serialize `output` as the single text content of a successful result.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::ParseFailed(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
