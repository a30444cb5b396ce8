//! Catalog-related MCP tools.
//!
//! This module provides tools for rebuilding and reading the SQLite catalog.

pub mod chart;
pub mod list;
pub mod rebuild;

pub use chart::{CatalogChartParams, chart_impl};
pub use list::{CatalogListParams, list_impl};
pub use rebuild::rebuild_impl;
