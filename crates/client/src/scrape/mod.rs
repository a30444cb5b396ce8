//! Title page scraper (IMDb).
//!
//! ### Pages
//! - Detail page: `{base}{id}/` for director, rating, cast, and a review
//! - Trivia page: `{base}{id}/trivia?ref_=tt_trv_trv` for up to five facts
//!
//! Both pages are cached as raw text, keyed by URL with no parameters.
//! Scraping never fails: an unusable ID or a failed page fetch defaults
//! that page's fields and leaves diagnostics on the record.

pub mod parse;

pub use parse::{MAX_TRIVIA, parse_detail_page, parse_trivia_page};

use std::sync::Arc;

use reelscout_core::{DiskCache, Error, FieldDiagnostic, ScrapeRecord, construct_unique_key};
use serde_json::Value;
use url::Url;

use crate::fetch::Transport;

const DETAIL_FIELDS: [&str; 4] = ["director", "rating", "cast", "review"];

/// Scraper for title detail and trivia pages.
#[derive(Clone)]
pub struct ScraperClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl ScraperClient {
    /// # Errors
    ///
    /// `InvalidUrl` if `base_url` does not parse.
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self { transport, base_url })
    }

    fn page_url(&self, external_id: &str, suffix: &str) -> Result<Url, Error> {
        if external_id.is_empty() || !external_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidInput(format!("unusable external id {external_id:?}")));
        }
        self.base_url
            .join(&format!("{external_id}/{suffix}"))
            .map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    pub fn detail_url(&self, external_id: &str) -> Result<Url, Error> {
        self.page_url(external_id, "")
    }

    pub fn trivia_url(&self, external_id: &str) -> Result<Url, Error> {
        self.page_url(external_id, "trivia?ref_=tt_trv_trv")
    }

    /// Page body for `url`, from the cache when present.
    async fn fetch_page(&self, cache: &mut DiskCache, url: &Url) -> Result<String, Error> {
        let key = construct_unique_key(url.as_str(), std::iter::empty::<(&str, &str)>());
        let value = cache
            .get_or_fetch(&key, || async {
                let body = self.transport.get_text(url.as_str(), &[]).await?;
                Ok(Value::String(body))
            })
            .await?;

        match value {
            Value::String(body) => Ok(body),
            _ => Err(Error::ParseFailed(format!("cached entry for {url} is not page text"))),
        }
    }

    /// Scrape both pages for `external_id`.
    ///
    /// `None` (no ID from the metadata lookup) yields an empty record.
    pub async fn scrape(&self, cache: &mut DiskCache, external_id: Option<&str>) -> ScrapeRecord {
        let mut record = ScrapeRecord::default();

        let Some(id) = external_id else {
            note_all(&mut record, &DETAIL_FIELDS, "no external id");
            note_all(&mut record, &["trivia"], "no external id");
            return record;
        };

        match self.detail_url(id) {
            Ok(url) => match self.fetch_page(cache, &url).await {
                Ok(html) => parse_detail_page(&html, &mut record),
                Err(e) => {
                    tracing::warn!(%url, "detail page unavailable: {}", e);
                    note_all(&mut record, &DETAIL_FIELDS, &format!("page unavailable: {e}"));
                }
            },
            Err(e) => note_all(&mut record, &DETAIL_FIELDS, &e.to_string()),
        }

        match self.trivia_url(id) {
            Ok(url) => match self.fetch_page(cache, &url).await {
                Ok(html) => parse_trivia_page(&html, &mut record),
                Err(e) => {
                    tracing::warn!(%url, "trivia page unavailable: {}", e);
                    note_all(&mut record, &["trivia"], &format!("page unavailable: {e}"));
                }
            },
            Err(e) => note_all(&mut record, &["trivia"], &e.to_string()),
        }

        record
    }
}

impl std::fmt::Debug for ScraperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScraperClient").field("base_url", &self.base_url.as_str()).finish_non_exhaustive()
    }
}

fn note_all(record: &mut ScrapeRecord, fields: &[&str], reason: &str) {
    record
        .diagnostics
        .extend(fields.iter().map(|field| FieldDiagnostic::new(*field, reason)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubTransport;

    const BASE: &str = "https://www.imdb.com/title/";
    const DETAIL: &str = "https://www.imdb.com/title/tt2294629/";
    const TRIVIA: &str = "https://www.imdb.com/title/tt2294629/trivia?ref_=tt_trv_trv";

    fn scraper(stub: StubTransport) -> (ScraperClient, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        (ScraperClient::new(stub.clone(), BASE).unwrap(), stub)
    }

    #[test]
    fn test_page_urls() {
        let (scraper, _) = scraper(StubTransport::default());
        assert_eq!(scraper.detail_url("tt2294629").unwrap().as_str(), DETAIL);
        assert_eq!(scraper.trivia_url("tt2294629").unwrap().as_str(), TRIVIA);
    }

    #[test]
    fn test_page_url_rejects_path_segments() {
        let (scraper, _) = scraper(StubTransport::default());
        assert!(scraper.detail_url("../../admin").is_err());
        assert!(scraper.detail_url("").is_err());
    }

    #[tokio::test]
    async fn test_scrape_caches_pages_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::open(dir.path().join("cache.json")).await;
        let (scraper, stub) = scraper(
            StubTransport::default()
                .with(DETAIL, r#"<span itemprop="ratingValue">7.4</span>"#)
                .with(TRIVIA, r#"<div class="sodatext">Fact</div>"#),
        );

        let first = scraper.scrape(&mut cache, Some("tt2294629")).await;
        let second = scraper.scrape(&mut cache, Some("tt2294629")).await;

        assert_eq!(first, second);
        assert_eq!(first.rating(), "7.4");
        assert_eq!(first.trivia, vec!["Fact"]);
        assert_eq!(stub.calls().len(), 2);
        assert!(cache.get(&format!("{DETAIL}_")).unwrap().is_string());
    }

    #[tokio::test]
    async fn test_scrape_without_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::open(dir.path().join("cache.json")).await;
        let (scraper, stub) = scraper(StubTransport::default());

        let record = scraper.scrape(&mut cache, None).await;
        assert_eq!(record.director(), "No Director/Creator");
        assert!(record.trivia.is_empty());
        assert_eq!(record.diagnostics.len(), 5);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_detail_page_keeps_trivia() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::open(dir.path().join("cache.json")).await;
        let (scraper, _) = scraper(StubTransport::default().with(TRIVIA, r#"<div class="sodatext">Fact</div>"#));

        let record = scraper.scrape(&mut cache, Some("tt2294629")).await;
        assert_eq!(record.rating(), "No Rating");
        assert_eq!(record.trivia, vec!["Fact"]);
        assert!(record.diagnostics.iter().all(|d| d.field != "trivia"));
        assert!(!cache.contains(&format!("{DETAIL}_")));
    }
}
