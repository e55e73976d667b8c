//! Response types for SEC EDGAR and the filing lookup record.

use std::collections::HashMap;

use serde::Deserialize;

use crate::status::FilingStatus;
use crate::tickers::Ticker;

/// Body of the `browse-edgar?action=getcompany&output=json` endpoint.
///
/// Only the nested filing list is read; every level is optional so a body
/// without filings deserializes cleanly and means "not found".
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BrowseResponse {
    #[serde(default)]
    pub filings: Option<FilingsBlock>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FilingsBlock {
    #[serde(default)]
    pub filings: Vec<FilingEntry>,
}

/// One filing in the registry listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilingEntry {
    #[serde(default)]
    pub filing_date: Option<String>,
    #[serde(default)]
    pub accession_number: Option<String>,
}

impl BrowseResponse {
    /// The most recent filing, which the registry lists first.
    pub fn into_first(self) -> Option<FilingEntry> {
        self.filings.and_then(|f| f.filings.into_iter().next())
    }
}

/// One row of `files/company_tickers.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyTickerEntry {
    pub cik_str: u64,
    pub ticker: String,
}

/// Build the ticker -> zero-padded CIK table.
///
/// Tickers that map to more than one CIK are dropped; an ambiguous answer is
/// treated the same as no answer.
pub fn build_cik_table(raw: HashMap<String, CompanyTickerEntry>) -> HashMap<String, String> {
    let mut table: HashMap<String, Option<String>> = HashMap::new();
    for entry in raw.into_values() {
        let Some(symbol) = Ticker::parse(&entry.ticker) else {
            continue;
        };
        let cik = format!("{:010}", entry.cik_str);
        table
            .entry(symbol.as_str().to_string())
            .and_modify(|existing| {
                if existing.as_deref() != Some(cik.as_str()) {
                    *existing = None;
                }
            })
            .or_insert_with(|| Some(cik.clone()));
    }
    table
        .into_iter()
        .filter_map(|(symbol, cik)| cik.map(|c| (symbol, c)))
        .collect()
}

/// Annual filing metadata for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct FilingLookup {
    pub ticker: Ticker,
    pub status: FilingStatus,
    pub filing_date: Option<String>,
    pub accession_number: Option<String>,
    /// CIK the lookup was keyed by, when resolution succeeded.
    pub cik: Option<String>,
}

impl FilingLookup {
    pub fn found(ticker: Ticker, entry: FilingEntry, cik: Option<String>) -> Self {
        Self {
            ticker,
            status: FilingStatus::Found,
            filing_date: entry.filing_date,
            accession_number: entry.accession_number,
            cik,
        }
    }

    /// A lookup with no data fields, carrying only `status`.
    pub fn empty(ticker: Ticker, status: FilingStatus, cik: Option<String>) -> Self {
        Self {
            ticker,
            status,
            filing_date: None,
            accession_number: None,
            cik,
        }
    }
}
