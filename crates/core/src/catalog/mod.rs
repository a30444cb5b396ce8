//! SQLite catalog of directors and movies built from cached metadata.
//!
//! - Two tables, Director and Movie, dropped and rebuilt by a batch load
//! - One name normalization for storing and resolving directors
//! - Skipped cache entries are counted and reported, never dropped silently
//! - Idempotent single-movie upsert keyed on (title, year, director)
//! - Sorted listings and bar-chart series for presentation

pub mod connection;
pub mod load;
pub mod names;
pub mod query;
pub mod schema;

pub use connection::CatalogDb;
pub use load::{LoadReport, METADATA_KEY_MARKER, RebuildReport, SkippedEntry};
pub use names::DirectorName;
pub use query::{BarChart, ChartField, MovieQuery, MovieRow, SortDir, SortKey};
