//! Error types for SEC EDGAR operations.

use thiserror::Error;

use crate::http::root_cause;
use crate::status::{FailureKind, FilingStatus};

/// Errors from SEC EDGAR operations.
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("HTTP {status}")]
    HttpStatus { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl EdgarError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EdgarError::HttpStatus { status: 404, .. } => FailureKind::NotFound,
            EdgarError::HttpStatus { status: 429, .. } => FailureKind::RateLimited,
            EdgarError::HttpStatus { .. } => FailureKind::Unavailable,
            EdgarError::ParseFailed(_) => FailureKind::Malformed,
            EdgarError::InvalidUrl(_) => FailureKind::Unavailable,
            EdgarError::Network(e) if e.is_timeout() => FailureKind::Timeout,
            EdgarError::Network(e) if e.is_decode() => FailureKind::Malformed,
            EdgarError::Network(_) => FailureKind::Unavailable,
        }
    }

    /// Row status for a failed lookup.
    ///
    /// A registry that answered with an error code, or could not be reached at
    /// all, is "unavailable"; timeouts and undecodable bodies are errors.
    pub fn to_status(&self) -> FilingStatus {
        let message = match self {
            EdgarError::Network(e) => root_cause(e),
            other => other.to_string(),
        };
        match self.kind() {
            FailureKind::Unavailable | FailureKind::NotFound | FailureKind::RateLimited => {
                FilingStatus::unavailable(message)
            }
            kind => FilingStatus::failed(kind, message),
        }
    }
}
