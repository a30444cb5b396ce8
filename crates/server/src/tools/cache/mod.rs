//! Cache-related MCP tools.
//!
//! This module provides read access to the JSON response cache.

pub mod get;

pub use get::{CacheGetParams, get_impl};
