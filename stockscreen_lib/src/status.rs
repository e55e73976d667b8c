//! Per-ticker fetch outcomes.
//!
//! Each fetcher reports a typed status rather than a free-text string. The
//! human-readable label is derived from the status and only used for display.

use std::fmt;

use serde::Serialize;

/// Maximum number of characters of an underlying error kept in a status label.
pub const MAX_STATUS_MESSAGE: usize = 30;

/// Why a single provider call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    NotFound,
    RateLimited,
    Unavailable,
    Malformed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::NotFound => "not found",
            FailureKind::RateLimited => "rate limited",
            FailureKind::Unavailable => "unavailable",
            FailureKind::Malformed => "malformed response",
        };
        f.write_str(s)
    }
}

/// Outcome of the market snapshot fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarketStatus {
    Success,
    Failed { kind: FailureKind, message: String },
}

impl MarketStatus {
    pub fn failed(kind: FailureKind, message: impl AsRef<str>) -> Self {
        Self::Failed {
            kind,
            message: truncate_message(message.as_ref()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MarketStatus::Success)
    }

    /// Display label for the status column.
    pub fn label(&self) -> String {
        match self {
            MarketStatus::Success => "success".to_string(),
            MarketStatus::Failed { message, .. } => format!("error: {}", message),
        }
    }
}

/// Outcome of the annual filing lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilingStatus {
    Found,
    NotFound,
    Unavailable { message: String },
    Failed { kind: FailureKind, message: String },
}

impl FilingStatus {
    pub fn unavailable(message: impl AsRef<str>) -> Self {
        Self::Unavailable {
            message: truncate_message(message.as_ref()),
        }
    }

    pub fn failed(kind: FailureKind, message: impl AsRef<str>) -> Self {
        Self::Failed {
            kind,
            message: truncate_message(message.as_ref()),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FilingStatus::Found)
    }

    pub fn label(&self) -> String {
        match self {
            FilingStatus::Found => "found".to_string(),
            FilingStatus::NotFound => "not found".to_string(),
            FilingStatus::Unavailable { message } => format!("unavailable: {}", message),
            FilingStatus::Failed { message, .. } => format!("error: {}", message),
        }
    }
}

/// Cut `message` to at most [`MAX_STATUS_MESSAGE`] characters.
///
/// Counts chars, not bytes, so multi-byte text never splits mid-character.
pub fn truncate_message(message: &str) -> String {
    message.trim().chars().take(MAX_STATUS_MESSAGE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_long_message() {
        let long = "x".repeat(100);
        assert_eq!(truncate_message(&long).len(), MAX_STATUS_MESSAGE);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(40);
        let cut = truncate_message(&text);
        assert_eq!(cut.chars().count(), MAX_STATUS_MESSAGE);
    }

    #[test]
    fn market_labels() {
        assert_eq!(MarketStatus::Success.label(), "success");
        let failed = MarketStatus::failed(FailureKind::Timeout, "operation timed out");
        assert_eq!(failed.label(), "error: operation timed out");
        assert!(!failed.is_success());
    }

    #[test]
    fn failed_constructor_truncates() {
        let failed = MarketStatus::failed(FailureKind::Malformed, "y".repeat(80));
        match failed {
            MarketStatus::Failed { message, kind } => {
                assert_eq!(message.len(), MAX_STATUS_MESSAGE);
                assert_eq!(kind, FailureKind::Malformed);
            }
            MarketStatus::Success => panic!("expected failure"),
        }
    }

    #[test]
    fn filing_labels() {
        assert_eq!(FilingStatus::Found.label(), "found");
        assert_eq!(FilingStatus::NotFound.label(), "not found");
        assert_eq!(FilingStatus::unavailable("HTTP 503").label(), "unavailable: HTTP 503");
        assert_eq!(
            FilingStatus::failed(FailureKind::Timeout, "timed out").label(),
            "error: timed out"
        );
    }

    #[test]
    fn failure_kind_display() {
        assert_eq!(FailureKind::RateLimited.to_string(), "rate limited");
        assert_eq!(FailureKind::NotFound.to_string(), "not found");
    }
}
