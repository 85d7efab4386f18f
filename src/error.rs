//! Error type shared by every acquisition workflow.
//!
//! Failures are surfaced to the caller as-is: nothing in this crate retries
//! or recovers locally.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquireError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A required element or attribute is missing from the markup.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Reading or writing the cache file or an output file.
    #[error("file I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    #[error("cache file format error: {0}")]
    CacheFormat(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("output serialization error: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AcquireError>;
