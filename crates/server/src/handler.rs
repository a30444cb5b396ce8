//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use crate::state::AppState;
use crate::tools::cache::{CacheGetParams, get_impl};
use crate::tools::catalog::{CatalogChartParams, CatalogListParams, chart_impl, list_impl, rebuild_impl};
use crate::tools::movie_search::{MovieSearchParams, search_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for reelscout.
#[derive(Clone)]
pub struct ReelscoutServer {
    tool_router: ToolRouter<Self>,
    state: Arc<AppState>,
}

#[tool_router]
impl ReelscoutServer {
    pub fn new(state: AppState) -> Self {
        Self { tool_router: Self::tool_router(), state: Arc::new(state) }
    }

    /// Look up a movie by title.
    #[tool(
        description = "Look up a movie by title. Returns OMDb metadata (title, year, rating, genre, plot, poster) plus director, rating, cast, a review, and up to five trivia facts scraped from IMDb. Set persist to also add the movie to the catalog."
    )]
    async fn movie_search(&self, params: Parameters<MovieSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.state, params.0).await
    }

    /// Rebuild the catalog from the response cache.
    #[tool(
        description = "Drop and recreate the Director/Movie catalog from every cached OMDb response. Returns counts and the entries that were skipped with reasons."
    )]
    async fn catalog_rebuild(&self) -> Result<CallToolResult, McpError> {
        rebuild_impl(&self.state).await
    }

    #[tool(description = "List catalog movies with their directors. Sort by title, year, rating, or director; asc or desc.")]
    async fn catalog_list(&self, params: Parameters<CatalogListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.state.catalog, params.0).await
    }

    #[tool(description = "Bar-chart data for the catalog: movie titles against rating or year.")]
    async fn catalog_chart(&self, params: Parameters<CatalogChartParams>) -> Result<CallToolResult, McpError> {
        chart_impl(&self.state.catalog, params.0).await
    }

    /// Read one entry from the response cache.
    #[tool(description = "Retrieve a cached OMDb response or IMDb page by its cache key.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.state.cache, params.0).await
    }
}

impl ServerHandler for ReelscoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "reelscout".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Search movies with movie_search, then use the catalog_* tools to rebuild, list, and chart the local catalog."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
