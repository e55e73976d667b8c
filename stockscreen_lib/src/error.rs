//! Error types for the library layer.

use std::fmt;

/// Run-level errors. Per-ticker provider failures never surface here; they
/// are recorded as statuses on the ticker's row instead.
#[derive(Debug)]
pub enum ScreenerError {
    /// The input contained no ticker symbols.
    NoTickers,
    /// The run finished without producing a single row.
    NoData,
    /// User-provided input failed validation.
    InvalidInput(String),
    /// An HTTP client could not be constructed.
    Client(reqwest::Error),
    /// CSV serialization failed.
    Csv(csv::Error),
}

impl fmt::Display for ScreenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTickers => write!(f, "Please enter at least one ticker symbol"),
            Self::NoData => write!(f, "No data retrieved"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Client(e) => write!(f, "HTTP client error: {}", e),
            Self::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for ScreenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for ScreenerError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<reqwest::Error> for ScreenerError {
    fn from(e: reqwest::Error) -> Self {
        Self::Client(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert!(ScreenerError::NoTickers.to_string().contains("at least one ticker"));
        assert_eq!(ScreenerError::NoData.to_string(), "No data retrieved");
        let invalid = ScreenerError::InvalidInput("bad".into());
        assert!(invalid.to_string().contains("bad"));
    }
}
