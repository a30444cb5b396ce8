//! movie_search tool implementation.
//!
//! Looks a title up in OMDb, scrapes its IMDb pages, and optionally writes
//! the movie into the catalog.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use reelscout_core::{Error, FieldDiagnostic, MovieReport};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Input parameters for the movie_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MovieSearchParams {
    /// Movie title to look up (required).
    pub title: String,

    /// Also insert or update the movie in the catalog.
    #[serde(default)]
    pub persist: bool,
}

/// Output structure for the movie_search tool.
///
/// Missing fields carry their display placeholder ("No title", "No Rating", ...);
/// `diagnostics` says which ones and why.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MovieSearchOutput {
    pub title: String,
    pub year: String,
    pub rated: String,
    pub genre: String,
    pub plot: String,
    pub external_id: String,
    pub poster: String,
    pub director: String,
    pub rating: String,
    pub cast: Vec<String>,
    pub review: String,
    /// Up to five facts, numbered from 1.
    pub trivia: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<FieldDiagnostic>,
    /// Movie ID when `persist` was set and the movie was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<i64>,
}

impl From<&MovieReport> for MovieSearchOutput {
    fn from(report: &MovieReport) -> Self {
        let (metadata, scrape) = (&report.metadata, &report.scrape);
        Self {
            title: metadata.title().to_string(),
            year: metadata.year().to_string(),
            rated: metadata.rated().to_string(),
            genre: metadata.genre().to_string(),
            plot: metadata.plot().to_string(),
            external_id: metadata.external_id().to_string(),
            poster: metadata.poster().to_string(),
            director: scrape.director().to_string(),
            rating: scrape.rating().to_string(),
            cast: scrape.cast.clone(),
            review: scrape.review().to_string(),
            trivia: report.numbered_trivia(),
            diagnostics: report.diagnostics().cloned().collect(),
            catalog_id: None,
        }
    }
}

pub async fn search(state: &AppState, params: MovieSearchParams) -> Result<MovieSearchOutput, Error> {
    let lookup = state.lookup()?;

    let outcome = {
        // Held across the metadata and page fetches on a miss, so other cache
        // tools wait for up to three request timeouts.
        let mut cache = state.cache.lock().await;
        lookup.search(&mut cache, &params.title).await?
    };

    let mut output = MovieSearchOutput::from(&outcome.report);

    if params.persist {
        match &outcome.raw_metadata {
            Some(raw) => match state.catalog.upsert_movie(raw).await {
                Ok(id) => output.catalog_id = Some(id),
                Err(Error::InvalidInput(reason)) => {
                    tracing::warn!(title = %params.title, "not persisted: {}", reason);
                    output.diagnostics.push(FieldDiagnostic::new("catalog", reason));
                }
                Err(e) => return Err(e),
            },
            None => output
                .diagnostics
                .push(FieldDiagnostic::new("catalog", "no metadata to persist")),
        }
    }

    Ok(output)
}

/// Implementation of the movie_search tool.
pub async fn search_impl(state: &AppState, params: MovieSearchParams) -> Result<CallToolResult, McpError> {
    let output = search(state, params).await?;
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::seeded_state;
    use reelscout_core::{CatalogDb, DiskCache, MovieQuery};

    fn params(title: &str, persist: bool) -> MovieSearchParams {
        MovieSearchParams { title: title.to_string(), persist }
    }

    #[tokio::test]
    async fn test_search_from_seeded_cache() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(&dir).await;

        let output = search(&state, params("Frozen", false)).await.unwrap();
        assert_eq!(output.title, "Frozen");
        assert_eq!(output.year, "2013");
        assert_eq!(output.director, "Chris Buck");
        assert_eq!(output.rating, "7.4");
        assert_eq!(output.review, "No Reviews");
        assert_eq!(output.trivia.len(), 5);
        assert_eq!(output.trivia[0], "[1] Fact 1");
        assert!(output.diagnostics.iter().any(|d| d.field == "review"));
        assert_eq!(output.catalog_id, None);

        let movies = state.catalog.list_movies(MovieQuery::default()).await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_search_persist_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(&dir).await;

        let first = search(&state, params("Frozen", true)).await.unwrap();
        let second = search(&state, params("Frozen", true)).await.unwrap();
        assert!(first.catalog_id.is_some());
        assert_eq!(first.catalog_id, second.catalog_id);

        let movies = state.catalog.list_movies(MovieQuery::default()).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].director(), "Chris Buck");
    }

    #[tokio::test]
    async fn test_search_blank_title_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(&dir).await;

        let result = search_impl(&state, params("   ", false)).await;
        assert_eq!(result.unwrap_err().code.0, -32602);
    }

    #[tokio::test]
    async fn test_search_without_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(dir.path().join("cache.json")).await;
        let catalog = CatalogDb::open_in_memory().await.unwrap();
        let missing = Error::MissingApiKey("Set REELSCOUT_OMDB_API_KEY environment variable".into());
        let state = AppState::new(cache, catalog, Err(missing));

        let result = search(&state, params("Frozen", false)).await;
        assert!(matches!(result, Err(Error::MissingApiKey(_))));
    }
}
