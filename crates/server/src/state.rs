//! Shared server state: disk cache, catalog, and lookup pipeline.

use std::sync::Arc;

use reelscout_client::{FetchClient, FetchConfig, MovieLookup};
use reelscout_core::{AppConfig, CatalogDb, DiskCache, Error};
use tokio::sync::Mutex;

/// State shared by every tool call.
///
/// The disk cache sits behind one mutex, so cache reads and rewrites from
/// concurrent tool calls never interleave.
#[derive(Debug)]
pub struct AppState {
    pub cache: Mutex<DiskCache>,
    pub catalog: CatalogDb,
    /// Why title search is unavailable when the pipeline could not be built.
    lookup: Result<MovieLookup, Error>,
}

impl AppState {
    /// Open the cache and catalog named by `config` and build the HTTP pipeline.
    ///
    /// A lookup pipeline that cannot be built (no OMDb key, bad scrape URL)
    /// is not fatal: catalog and cache tools keep working and `movie_search`
    /// reports the original error.
    pub async fn open(config: &AppConfig) -> Result<Self, Error> {
        let cache = DiskCache::open(&config.cache_path).await;
        let catalog = CatalogDb::open(&config.db_path).await?;
        let transport = Arc::new(FetchClient::new(FetchConfig::from(config))?);

        let lookup = MovieLookup::from_config(config, transport);
        if let Err(e) = &lookup {
            tracing::warn!("title search disabled: {}", e);
        }

        Ok(Self::new(cache, catalog, lookup))
    }

    pub fn new(cache: DiskCache, catalog: CatalogDb, lookup: Result<MovieLookup, Error>) -> Self {
        Self { cache: Mutex::new(cache), catalog, lookup }
    }

    pub fn lookup(&self) -> Result<&MovieLookup, Error> {
        self.lookup.as_ref().map_err(|e| match e {
            Error::MissingApiKey(msg) => Error::MissingApiKey(msg.clone()),
            Error::InvalidUrl(msg) => Error::InvalidUrl(msg.clone()),
            other => Error::InvalidInput(format!("title search unavailable: {other}")),
        })
    }
}
