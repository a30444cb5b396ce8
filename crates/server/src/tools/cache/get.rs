//! cache_get tool implementation.
//!
//! Retrieves a cached response by its unique key.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use reelscout_core::{DiskCache, Error};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Cache key, e.g. `http://www.omdbapi.com/_apikey_KEY_t_Frozen`.
    pub key: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub key: String,
    /// Parsed JSON for metadata responses, page text for scraped pages.
    pub value: Value,
}

pub fn get(cache: &DiskCache, params: CacheGetParams) -> Result<CacheGetOutput, Error> {
    let value = cache
        .get(&params.key)
        .cloned()
        .ok_or_else(|| Error::CacheMiss(params.key.clone()))?;

    Ok(CacheGetOutput { key: params.key, value })
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &tokio::sync::Mutex<DiskCache>, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let output = get(&*cache.lock().await, params)?;
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::{FROZEN_DETAIL_KEY, FROZEN_METADATA_KEY, seeded_state};

    #[tokio::test]
    async fn test_get_impl_missing() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(&dir).await;
        let params = CacheGetParams { key: "nonexistent".to_string() };

        let result = get_impl(&state.cache, params).await;
        assert_eq!(result.unwrap_err().code.0, -32001);
    }

    #[tokio::test]
    async fn test_get_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(&dir).await;
        let cache = state.cache.lock().await;

        let output = get(&cache, CacheGetParams { key: FROZEN_METADATA_KEY.to_string() }).unwrap();
        assert_eq!(output.value["Title"], "Frozen");

        let page = get(&cache, CacheGetParams { key: FROZEN_DETAIL_KEY.to_string() }).unwrap();
        assert!(page.value.as_str().unwrap().contains("Chris Buck"));
    }
}
