//! catalog_list tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use reelscout_core::{CatalogDb, Error, MovieQuery, SortDir, SortKey};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the catalog_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogListParams {
    /// Sort column: title (default), year, rating, or director.
    #[serde(default)]
    pub sort: SortKey,

    /// Sort direction: asc (default) or desc.
    #[serde(default)]
    pub dir: SortDir,
}

/// One catalog row in tool output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub rating: Option<f64>,
    pub director: String,
}

/// Output from the catalog_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogListOutput {
    pub count: usize,
    pub movies: Vec<CatalogEntry>,
}

pub async fn list(catalog: &CatalogDb, params: CatalogListParams) -> Result<CatalogListOutput, Error> {
    let rows = catalog
        .list_movies(MovieQuery { sort: params.sort, dir: params.dir })
        .await?;

    let movies: Vec<CatalogEntry> = rows
        .into_iter()
        .map(|row| CatalogEntry {
            director: row.director(),
            id: row.id,
            title: row.title,
            year: row.year,
            rating: row.rating,
        })
        .collect();

    Ok(CatalogListOutput { count: movies.len(), movies })
}

/// Implementation of the catalog_list tool.
pub async fn list_impl(catalog: &CatalogDb, params: CatalogListParams) -> Result<CallToolResult, McpError> {
    let output = list(catalog, params).await?;
    json_result(&output)
}
