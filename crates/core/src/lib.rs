//! Core types and shared functionality for reelscout.
//!
//! This crate provides:
//! - Request cache keys and the JSON disk cache
//! - Metadata and scrape record types
//! - SQLite catalog of directors and movies
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod record;

pub use cache::{DiskCache, construct_unique_key};
pub use catalog::{
    BarChart, CatalogDb, ChartField, DirectorName, LoadReport, MovieQuery, MovieRow, RebuildReport, SkippedEntry, SortDir,
    SortKey,
};
pub use config::AppConfig;
pub use error::Error;
pub use record::{FieldDiagnostic, MetadataRecord, MovieReport, ScrapeRecord};
