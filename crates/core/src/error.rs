//! Unified error types for reelscout.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the reelscout pipeline and server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty title).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No disk cache entry found for the given key.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Disk cache document could not be written.
    #[error("CACHE_IO: {0}")]
    CacheIo(String),

    /// Catalog database operation failed.
    #[error("CATALOG_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Response body could not be parsed.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// Metadata API key is not configured.
    #[error("MISSING_API_KEY: {0}")]
    MissingApiKey(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::CacheIo(msg) => (-32002, msg.clone()),
            Error::Database(e) => (-32003, e.to_string()),
            Error::InvalidUrl(msg) => (-32004, msg.clone()),
            Error::FetchTimeout(msg) => (-32005, msg.clone()),
            Error::FetchTooLarge(msg) => (-32006, msg.clone()),
            Error::HttpError(msg) => (-32007, msg.clone()),
            Error::ParseFailed(msg) => (-32008, msg.clone()),
            Error::MissingApiKey(msg) => (-32009, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
