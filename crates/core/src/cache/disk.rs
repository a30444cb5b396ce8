//! JSON document cache persisted to a single file.
//!
//! The whole map is loaded once by [`DiskCache::open`] and rewritten in full
//! whenever a new entry is stored. Values are `serde_json::Value`: API
//! responses keep their parsed structure, scraped pages are stored as JSON
//! strings.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::Error;

/// File-backed request cache.
///
/// Not internally synchronized; callers that share one cache across tasks
/// wrap it in a mutex.
#[derive(Debug)]
pub struct DiskCache {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl DiskCache {
    /// Open the cache document at `path`.
    ///
    /// A missing, unreadable, or malformed document yields an empty cache;
    /// the failure is logged and not returned.
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, Value>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "cache document is malformed, starting empty: {}", e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                tracing::debug!(path = %path.display(), "no readable cache document, starting empty: {}", e);
                BTreeMap::new()
            }
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened disk cache");

        Self { path, entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Return the cached value for `key`, or fetch, store, and persist it.
    ///
    /// `fetch` is only invoked on a miss. A failed fetch is returned as-is
    /// and nothing is stored. A fetched value is returned even when the
    /// document cannot be rewritten; it then lives in memory only.
    pub async fn get_or_fetch<F, Fut>(&mut self, key: &str, fetch: F) -> Result<Value, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, Error>>,
    {
        if let Some(value) = self.entries.get(key) {
            tracing::debug!("cache hit for {}", key);
            return Ok(value.clone());
        }

        tracing::debug!("cache miss for {}, fetching", key);
        let value = fetch().await?;
        self.entries.insert(key.to_string(), value.clone());
        if let Err(e) = self.flush().await {
            tracing::warn!(key, "cache entry not persisted: {}", e);
        }
        Ok(value)
    }

    /// Store `value` under `key` and rewrite the document.
    pub async fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), Error> {
        self.entries.insert(key.into(), value);
        self.flush().await
    }

    /// Write the whole map to disk.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// original.
    pub async fn flush(&self) -> Result<(), Error> {
        let json = serde_json::to_string(&self.entries).map_err(|e| Error::CacheIo(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::CacheIo(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| Error::CacheIo(format!("failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::CacheIo(format!("failed to replace {}: {}", self.path.display(), e)))?;

        Ok(())
    }
}
