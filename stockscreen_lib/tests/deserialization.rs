use std::collections::HashMap;

use serde_json::json;
use stockscreen_lib::edgar::types::{build_cik_table, BrowseResponse, CompanyTickerEntry};
use stockscreen_lib::yahoo::types::{ChartResponse, QuoteSummaryResponse};
use stockscreen_lib::YahooError;

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn quote_summary_flattens_all_modules() {
    let resp: QuoteSummaryResponse =
        serde_json::from_str(&load_fixture("quote_summary_aapl.json")).unwrap();
    let fields = resp.into_fields().unwrap();

    assert_eq!(fields["marketCap"], json!(2952030011392_i64));
    assert_eq!(fields["trailingPE"], json!(29.46));
    assert_eq!(fields["sharesOutstanding"], json!(15550100480_i64));
    assert_eq!(fields["currentPrice"], json!(189.84));
    assert_eq!(fields["currency"], json!("USD"));
    // first module listing the key wins
    assert_eq!(fields["beta"], json!(1.29));
}

#[test]
fn quote_summary_not_found_body() {
    let resp: QuoteSummaryResponse =
        serde_json::from_str(&load_fixture("quote_summary_not_found.json")).unwrap();
    assert!(matches!(resp.into_fields(), Err(YahooError::NotFound)));
}

#[test]
fn chart_skips_missing_closes() {
    let resp: ChartResponse = serde_json::from_str(&load_fixture("chart_aapl.json")).unwrap();
    let closes = resp.into_closes().unwrap();
    assert_eq!(closes, vec![172.62, 173.72, 178.67, 189.84]);
}

#[test]
fn chart_not_found_body() {
    let resp: ChartResponse = serde_json::from_str(&load_fixture("chart_not_found.json")).unwrap();
    assert!(matches!(resp.into_closes(), Err(YahooError::NotFound)));
}

#[test]
fn browse_fixture_first_filing() {
    let resp: BrowseResponse = serde_json::from_str(&load_fixture("browse_10k_aapl.json")).unwrap();
    let entry = resp.into_first().unwrap();
    assert_eq!(entry.filing_date.as_deref(), Some("2023-11-03"));
    assert_eq!(entry.accession_number.as_deref(), Some("0000320193-23-000106"));

    let empty: BrowseResponse = serde_json::from_str(&load_fixture("browse_empty.json")).unwrap();
    assert!(empty.into_first().is_none());
}

#[test]
fn company_tickers_fixture_builds_table() {
    let raw: HashMap<String, CompanyTickerEntry> =
        serde_json::from_str(&load_fixture("company_tickers.json")).unwrap();
    let table = build_cik_table(raw);
    assert_eq!(table.len(), 4);
    assert_eq!(table.get("GOOG"), table.get("GOOGL"));
    assert_eq!(table.get("MSFT").map(String::as_str), Some("0000789019"));
}
