//! Error types for Yahoo Finance operations.

use thiserror::Error;

use crate::http::root_cause;
use crate::status::FailureKind;

/// Errors from Yahoo Finance operations.
#[derive(Error, Debug)]
pub enum YahooError {
    #[error("Rate limited by Yahoo Finance (HTTP 429)")]
    RateLimited,
    #[error("Ticker not found on Yahoo Finance")]
    NotFound,
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl YahooError {
    /// Collapse into the closed failure enumeration carried by row statuses.
    pub fn kind(&self) -> FailureKind {
        match self {
            YahooError::RateLimited => FailureKind::RateLimited,
            YahooError::NotFound => FailureKind::NotFound,
            YahooError::HttpStatus { .. } => FailureKind::Unavailable,
            YahooError::ParseFailed(_) => FailureKind::Malformed,
            YahooError::InvalidUrl(_) => FailureKind::Unavailable,
            YahooError::Network(e) if e.is_timeout() => FailureKind::Timeout,
            YahooError::Network(e) if e.is_decode() => FailureKind::Malformed,
            YahooError::Network(_) => FailureKind::Unavailable,
        }
    }

    /// Short text for the row status: the underlying cause for transport
    /// errors, the full message otherwise.
    pub fn status_message(&self) -> String {
        match self {
            YahooError::Network(e) => root_cause(e),
            other => other.to_string(),
        }
    }
}
