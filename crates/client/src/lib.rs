//! Client code for reelscout.
//!
//! This crate provides the HTTP transport, the metadata API client, the
//! title-page scraper, and the lookup pipeline that combines them, shared by
//! the server and CLI.

pub mod fetch;
pub mod lookup;
pub mod omdb;
pub mod scrape;

pub use fetch::{FetchClient, FetchConfig, Transport};
pub use lookup::{MovieLookup, SearchOutcome};
pub use omdb::{MetadataClient, MetadataLookup, normalize_metadata};
pub use scrape::{ScraperClient, parse_detail_page, parse_trivia_page};
