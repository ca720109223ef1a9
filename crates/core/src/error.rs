//! Unified error types for folio.
//!
//! Everything that can fail in the core and client crates funnels into this
//! enum. Cache-front and search operations catch these at their boundary and
//! degrade to defined results (miss, empty list, fallback scroll); only live
//! data sources surface errors to callers.

use tokio_rusqlite::rusqlite;

/// Unified error type for folio operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backing-store operation failed.
    #[error("store error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("store migration failed: {0}")]
    MigrationFailed(String),

    /// Cached value or API payload could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Text-layer provider failed to produce page text.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    /// Network failure reaching a live source.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Live source answered with a non-success HTTP status.
    #[error("http status {0}")]
    HttpStatus(u16),

    /// Response body exceeded the configured size limit.
    #[error("response too large: {0} bytes exceeds {1}")]
    TooLarge(usize, usize),

    /// Scraped page did not contain the expected content.
    #[error("scrape failed: {0}")]
    Scrape(String),

    /// Live fetch failed and no cached value exists to fall back on.
    #[error("source exhausted: {0}")]
    SourceExhausted(String),
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
