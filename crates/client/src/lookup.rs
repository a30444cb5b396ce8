//! Title search pipeline: metadata lookup, then scraping by external ID.

use std::sync::Arc;

use reelscout_core::{AppConfig, DiskCache, Error, MovieReport};
use serde_json::Value;

use crate::fetch::Transport;
use crate::omdb::MetadataClient;
use crate::scrape::ScraperClient;

/// Result of [`MovieLookup::search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub report: MovieReport,
    /// Metadata response as cached, for loading into the catalog.
    pub raw_metadata: Option<Value>,
}

/// Runs both clients against one cache.
#[derive(Debug, Clone)]
pub struct MovieLookup {
    metadata: MetadataClient,
    scraper: ScraperClient,
}

impl MovieLookup {
    pub fn new(metadata: MetadataClient, scraper: ScraperClient) -> Self {
        Self { metadata, scraper }
    }

    /// Build both clients from configuration.
    ///
    /// # Errors
    ///
    /// `MissingApiKey` if no OMDb key is configured; `InvalidUrl` if the
    /// scrape base URL does not parse.
    pub fn from_config(config: &AppConfig, transport: Arc<dyn Transport>) -> Result<Self, Error> {
        let api_key = config
            .require_omdb_api_key()
            .map_err(|e| Error::MissingApiKey(e.to_string()))?;

        let metadata = MetadataClient::new(transport.clone(), &config.metadata_base_url, api_key);
        let scraper = ScraperClient::new(transport, &config.scrape_base_url)?;
        Ok(Self::new(metadata, scraper))
    }

    /// Look up `title` and scrape the title pages for the ID it returns.
    ///
    /// # Errors
    ///
    /// Only `InvalidInput` for a blank title; network and extraction
    /// failures end up as diagnostics on the report.
    pub async fn search(&self, cache: &mut DiskCache, title: &str) -> Result<SearchOutcome, Error> {
        let lookup = self.metadata.lookup(cache, title).await?;
        let (metadata, raw_metadata) = (lookup.record, lookup.raw);

        let scrape = self.scraper.scrape(cache, metadata.external_id.as_deref()).await;

        tracing::debug!(
            title,
            external_id = metadata.external_id(),
            cast = scrape.cast.len(),
            trivia = scrape.trivia.len(),
            "search complete"
        );

        Ok(SearchOutcome { report: MovieReport { metadata, scrape }, raw_metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubTransport;

    const OMDB: &str = "http://stub.test/omdb/";
    const IMDB: &str = "http://stub.test/title/";

    const FROZEN_JSON: &str = r#"{
        "Title": "Frozen", "Year": "2013", "Rated": "PG", "Genre": "Animation, Adventure, Comedy",
        "Plot": "When the newly crowned Queen Elsa accidentally uses her power...",
        "imdbID": "tt2294629", "Poster": "https://m.media-amazon.com/images/frozen.jpg",
        "Director": "Chris Buck, Jennifer Lee", "imdbRating": "7.4", "Response": "True"
    }"#;

    const FROZEN_DETAIL: &str = r#"
        <div class="credit_summary_item"><h4>Directors:</h4><a href="/name/1/">Chris Buck</a></div>
        <span itemprop="ratingValue">7.4</span>
        <table><tr><td><a href="/name/2/">Kristen Bell</a></td></tr></table>
        <div class="user-comments"><p>Let it go.</p></div>
    "#;

    fn frozen_trivia() -> String {
        (1..=8).map(|i| format!(r#"<div class="sodatext">Trivia {i}</div>"#)).collect()
    }

    fn config() -> AppConfig {
        AppConfig {
            omdb_api_key: Some("k1".into()),
            metadata_base_url: OMDB.into(),
            scrape_base_url: IMDB.into(),
            ..Default::default()
        }
    }

    fn frozen_stub() -> Arc<StubTransport> {
        Arc::new(
            StubTransport::default()
                .with(OMDB, FROZEN_JSON)
                .with("http://stub.test/title/tt2294629/", FROZEN_DETAIL)
                .with("http://stub.test/title/tt2294629/trivia?ref_=tt_trv_trv", &frozen_trivia()),
        )
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = AppConfig { omdb_api_key: None, ..config() };
        let result = MovieLookup::from_config(&config, Arc::new(StubTransport::default()));
        assert!(matches!(result, Err(Error::MissingApiKey(_))));
    }

    #[tokio::test]
    async fn test_search_frozen_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::open(dir.path().join("cache.json")).await;
        let stub = frozen_stub();
        let lookup = MovieLookup::from_config(&config(), stub.clone()).unwrap();

        let outcome = lookup.search(&mut cache, "Frozen").await.unwrap();
        let report = &outcome.report;

        assert_eq!(report.metadata.title(), "Frozen");
        assert_eq!(report.metadata.year(), "2013");
        assert_eq!(report.metadata.poster(), "https://m.media-amazon.com/images/frozen.jpg");
        assert_eq!(report.scrape.director(), "Chris Buck");
        assert_eq!(report.scrape.cast, vec!["Kristen Bell"]);
        assert_eq!(report.scrape.review(), "Let it go.");
        assert!(report.scrape.trivia.len() <= 5);
        assert_eq!(report.scrape.trivia.first().map(String::as_str), Some("Trivia 1"));
        assert_eq!(outcome.raw_metadata.as_ref().unwrap()["imdbRating"], "7.4");

        assert_eq!(cache.len(), 3);
        assert!(cache.contains("http://stub.test/omdb/_apikey_k1_t_Frozen"));
    }

    #[tokio::test]
    async fn test_repeat_search_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let stub = frozen_stub();
        let lookup = MovieLookup::from_config(&config(), stub.clone()).unwrap();

        let mut cache = DiskCache::open(&path).await;
        let first = lookup.search(&mut cache, "Frozen").await.unwrap();
        assert_eq!(stub.calls().len(), 3);

        let mut reopened = DiskCache::open(&path).await;
        let second = lookup.search(&mut reopened, "Frozen").await.unwrap();
        assert_eq!(stub.calls().len(), 3);
        assert_eq!(first.report, second.report);
    }

    #[tokio::test]
    async fn test_search_with_unwritable_cache_keeps_fetched_data() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "regular file").unwrap();
        let mut cache = DiskCache::open(blocker.join("cache.json")).await;
        let stub = frozen_stub();
        let lookup = MovieLookup::from_config(&config(), stub.clone()).unwrap();

        let outcome = lookup.search(&mut cache, "Frozen").await.unwrap();
        assert_eq!(outcome.report.metadata.title(), "Frozen");
        assert_eq!(outcome.report.scrape.director(), "Chris Buck");
        assert!(outcome.raw_metadata.is_some());
        assert_eq!(stub.calls().len(), 3);

        lookup.search(&mut cache, "Frozen").await.unwrap();
        assert_eq!(stub.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_search_unknown_title_skips_scraping() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::open(dir.path().join("cache.json")).await;
        let stub = Arc::new(StubTransport::default().with(OMDB, r#"{"Response":"False","Error":"Movie not found!"}"#));
        let lookup = MovieLookup::from_config(&config(), stub.clone()).unwrap();

        let outcome = lookup.search(&mut cache, "zzzz").await.unwrap();
        assert_eq!(outcome.report.metadata.title(), "No title");
        assert_eq!(outcome.report.scrape.rating(), "No Rating");
        assert_eq!(stub.calls().len(), 1);
        assert_eq!(outcome.report.diagnostics().count(), 7 + 5);
    }

    #[tokio::test]
    async fn test_search_network_down_masks_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::open(dir.path().join("cache.json")).await;
        let lookup = MovieLookup::from_config(&config(), Arc::new(StubTransport::default())).unwrap();

        let outcome = lookup.search(&mut cache, "Frozen").await.unwrap();
        assert!(outcome.raw_metadata.is_none());
        assert_eq!(outcome.report.metadata.external_id(), "No ID");
        assert!(cache.is_empty());
    }
}
