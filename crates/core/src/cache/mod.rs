//! Request cache shared by the metadata and scrape clients.
//!
//! - Deterministic request keys built from a base URL and sorted parameters
//! - A single JSON document on disk mapping keys to responses
//! - Parsed JSON for API responses, JSON strings for raw page text
//! - No expiry and no eviction; the map only grows

pub mod disk;
pub mod key;

pub use crate::Error;

pub use disk::DiskCache;
pub use key::construct_unique_key;
