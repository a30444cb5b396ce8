//! HTTP transport used by the metadata and scrape clients.
//!
//! - One GET per request, query parameters appended by reqwest
//! - Non-2xx statuses are errors
//! - Max body bytes: 5MB (configurable)
//! - Request timeout: 20s (configurable)
//!
//! Clients depend on the [`Transport`] trait rather than on reqwest so the
//! network can be replaced in tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, header};
use reelscout_core::{AppConfig, Error};

/// Performs a GET and returns the body as text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "reelscout/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "reelscout/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn too_large(&self, len: usize) -> Error {
        Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes))
    }
}

#[async_trait]
impl Transport for FetchClient {
    async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        let start = Instant::now();
        let parsed = url::Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

        let response = self
            .http
            .get(parsed)
            .query(params)
            .header(header::ACCEPT, "text/html,application/json;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{url}: {e}"))
                } else {
                    Error::HttpError(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(self.too_large(len as usize));
        }

        let final_url = response.url().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(self.too_large(bytes.len()));
        }

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Canned-response transport for pipeline tests.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct StubTransport {
        responses: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl StubTransport {
        pub fn with(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(url.to_string(), body.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String, Error> {
            let rendered = params.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
            self.calls.lock().unwrap().push(format!("{url}?{rendered}"));
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::HttpError("status 404".into()))
        }
    }
}
