//! Metadata API (OMDb) client.
//!
//! One GET per title with `apikey` and `t` parameters. Responses are cached
//! as parsed JSON under the key built from the base URL and both parameters.
//! Normalization never fails: absent fields become `None` and are listed in
//! the record's diagnostics.

use std::sync::Arc;

use reelscout_core::{DiskCache, Error, FieldDiagnostic, MetadataRecord, construct_unique_key};
use serde_json::Value;

use crate::fetch::Transport;

/// Response fields read into a [`MetadataRecord`], in record order.
const FIELDS: [&str; 7] = ["Title", "Year", "Rated", "Genre", "Plot", "imdbID", "Poster"];

/// Result of [`MetadataClient::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataLookup {
    pub record: MetadataRecord,
    /// Response as cached, for loading into the catalog.
    pub raw: Option<Value>,
}

/// Client for the metadata API.
#[derive(Clone)]
pub struct MetadataClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: String,
}

impl MetadataClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { transport, base_url: base_url.into(), api_key: api_key.into() }
    }

    fn params<'a>(&'a self, title: &'a str) -> [(&'a str, &'a str); 2] {
        [("apikey", self.api_key.as_str()), ("t", title)]
    }

    /// Cache key for a title search.
    pub fn request_key(&self, title: &str) -> String {
        construct_unique_key(&self.base_url, self.params(title))
    }

    /// Raw JSON response for `title`, from the cache when present.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank title; transport and JSON parse errors on a
    /// cache miss.
    pub async fn fetch_raw(&self, cache: &mut DiskCache, title: &str) -> Result<Value, Error> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("title cannot be empty".into()));
        }

        let key = self.request_key(title);
        let params = self.params(title);
        cache
            .get_or_fetch(&key, || async {
                let body = self.transport.get_text(&self.base_url, &params).await?;
                serde_json::from_str::<Value>(&body).map_err(|e| Error::ParseFailed(format!("metadata response: {e}")))
            })
            .await
    }

    /// Normalized metadata for `title`, with the raw response when one arrived.
    ///
    /// Fetch failures are logged and reported as diagnostics on an otherwise
    /// empty record. Only a blank title is an error.
    pub async fn lookup(&self, cache: &mut DiskCache, title: &str) -> Result<MetadataLookup, Error> {
        match self.fetch_raw(cache, title).await {
            Ok(raw) => Ok(MetadataLookup { record: normalize_metadata(&raw), raw: Some(raw) }),
            Err(e @ Error::InvalidInput(_)) => Err(e),
            Err(e) => {
                tracing::warn!(title, "metadata lookup failed: {}", e);
                Ok(MetadataLookup { record: failed_record(&e), raw: None })
            }
        }
    }
}

impl std::fmt::Debug for MetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

/// Record for a lookup whose response never arrived.
fn failed_record(err: &Error) -> MetadataRecord {
    MetadataRecord {
        diagnostics: FIELDS.iter().map(|f| FieldDiagnostic::new(*f, format!("request failed: {err}"))).collect(),
        ..Default::default()
    }
}

/// Read the recognized fields out of a metadata response.
///
/// A field counts as missing when it is absent, not a string, blank, or the
/// API's `"N/A"`.
pub fn normalize_metadata(value: &Value) -> MetadataRecord {
    let mut diagnostics = Vec::new();
    let mut field = |name: &str| -> Option<String> {
        match value.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() && s.trim() != "N/A" => Some(s.trim().to_string()),
            Some(Value::String(_)) => {
                diagnostics.push(FieldDiagnostic::new(name, "not available"));
                None
            }
            Some(_) => {
                diagnostics.push(FieldDiagnostic::new(name, "not a string"));
                None
            }
            None => {
                diagnostics.push(FieldDiagnostic::new(name, "absent"));
                None
            }
        }
    };

    let [title, year, rated, genre, plot, external_id, poster] = FIELDS.map(&mut field);

    if let Some(Value::String(reason)) = value.get("Error") {
        tracing::debug!("metadata API reported: {}", reason);
    }

    MetadataRecord { title, year, rated, genre, plot, external_id, poster, diagnostics }
}
