//! Ticker symbol parsing.
//!
//! Input is free-form text: one symbol per line, several comma-separated
//! symbols per line, or any mix of the two.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// An uppercase, non-empty ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize a raw token. Returns `None` if nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deduplicated set of tickers. Iterates in lexicographic order so the
/// result table is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerSet(BTreeSet<Ticker>);

impl TickerSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticker> {
        self.0.iter()
    }

    /// Comma-joined symbols, for the "found N ticker(s)" banner.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(Ticker::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Ticker> for TickerSet {
    fn from_iter<I: IntoIterator<Item = Ticker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TickerSet {
    type Item = &'a Ticker;
    type IntoIter = std::collections::btree_set::Iter<'a, Ticker>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Split `input` on newlines and commas, trim, uppercase, drop empties, dedupe.
///
/// Never fails: empty input yields an empty set.
pub fn parse_tickers(input: &str) -> TickerSet {
    input
        .lines()
        .flat_map(|line| line.split(','))
        .filter_map(Ticker::parse)
        .collect()
}
