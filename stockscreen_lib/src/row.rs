//! Row assembly: one flat record per ticker.

use serde::Serialize;

use crate::cell::Cell;
use crate::edgar::FilingLookup;
use crate::schema::{ColumnSource, FieldSchema};
use crate::status::{FilingStatus, MarketStatus};
use crate::tickers::Ticker;
use crate::yahoo::MarketSnapshot;

/// One output record. `cells` follows the schema's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub ticker: Ticker,
    pub market_status: MarketStatus,
    pub filing_status: FilingStatus,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell for `column`, looked up by position in `schema`.
    pub fn get<'a>(&'a self, schema: &FieldSchema, column: &str) -> Option<&'a Cell> {
        schema
            .columns()
            .iter()
            .position(|c| c.name == column)
            .and_then(|i| self.cells.get(i))
    }

    /// Cells rendered as display text, nulls as empty strings.
    pub fn to_strings(&self) -> Vec<String> {
        self.cells.iter().map(Cell::to_string).collect()
    }
}

/// Copy every source into its named column, in schema order.
pub fn assemble(
    schema: &FieldSchema,
    ticker: &Ticker,
    snapshot: &MarketSnapshot,
    lookup: &FilingLookup,
) -> Row {
    let cells = schema
        .columns()
        .iter()
        .map(|column| match &column.source {
            ColumnSource::Ticker => Cell::Text(ticker.to_string()),
            ColumnSource::MarketStatus => Cell::Text(snapshot.status.label()),
            ColumnSource::FilingStatus => Cell::Text(lookup.status.label()),
            ColumnSource::FilingDate => Cell::from(lookup.filing_date.clone()),
            ColumnSource::FilingAccession => Cell::from(lookup.accession_number.clone()),
            ColumnSource::FilingCik => Cell::from(lookup.cik.clone()),
            ColumnSource::CurrentPrice => Cell::from(snapshot.current_price),
            ColumnSource::Provider(key) => snapshot.value(key).clone(),
            ColumnSource::DailyClosesAvailable => Cell::Bool(snapshot.daily_closes_available),
            ColumnSource::Placeholder => Cell::Null,
        })
        .collect();

    Row {
        ticker: ticker.clone(),
        market_status: snapshot.status.clone(),
        filing_status: lookup.status.clone(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::FailureKind;
    use crate::yahoo::YahooError;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    fn good_snapshot(schema: &FieldSchema) -> MarketSnapshot {
        let fields: HashMap<String, Value> = [
            ("currentPrice", json!(189.5)),
            ("marketCap", json!(2950000000000_i64)),
            ("trailingPE", json!(29.4)),
            ("enterpriseToEbitda", json!(22.1)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        MarketSnapshot::from_parts(ticker("AAPL"), &schema.provider_keys(), &fields, &[180.0, 189.0])
    }

    fn found_lookup() -> FilingLookup {
        FilingLookup {
            ticker: ticker("AAPL"),
            status: FilingStatus::Found,
            filing_date: Some("2024-11-01".to_string()),
            accession_number: Some("0000320193-24-000123".to_string()),
            cik: Some("0000320193".to_string()),
        }
    }

    #[test]
    fn raw_row_copies_values_in_order() {
        let schema = FieldSchema::raw();
        let row = assemble(&schema, &ticker("AAPL"), &good_snapshot(&schema), &found_lookup());

        assert_eq!(row.cells.len(), schema.len());
        assert_eq!(row.cells[0], Cell::Text("AAPL".to_string()));
        assert_eq!(row.get(&schema, "yahoo_status"), Some(&Cell::Text("success".to_string())));
        assert_eq!(row.get(&schema, "sec_status"), Some(&Cell::Text("found".to_string())));
        assert_eq!(
            row.get(&schema, "sec_filing_date"),
            Some(&Cell::Text("2024-11-01".to_string()))
        );
        assert_eq!(row.get(&schema, "current_price"), Some(&Cell::Number(189.5)));
        assert_eq!(row.get(&schema, "market_cap"), Some(&Cell::Integer(2950000000000)));
        assert_eq!(row.get(&schema, "dividend_yield"), Some(&Cell::Null));
        assert_eq!(row.get(&schema, "daily_closes_available"), Some(&Cell::Bool(true)));
        assert!(row.market_status.is_success());
        assert!(row.filing_status.is_found());
    }

    #[test]
    fn failed_sources_keep_full_width() {
        let schema = FieldSchema::raw();
        let err = YahooError::NotFound;
        let snapshot = MarketSnapshot::failed(ticker("ZZZZINVALID"), &err);
        let lookup = FilingLookup::empty(ticker("ZZZZINVALID"), FilingStatus::NotFound, None);

        let row = assemble(&schema, &ticker("ZZZZINVALID"), &snapshot, &lookup);

        assert_eq!(row.cells.len(), schema.len());
        // everything after the three status columns is null, except the chart flag
        let data = &row.cells[3..];
        let last = data.len() - 1;
        assert!(data[..last].iter().all(Cell::is_null));
        assert_eq!(data[last], Cell::Bool(false));
        assert_eq!(row.get(&schema, "sec_status"), Some(&Cell::Text("not found".to_string())));
        match &row.market_status {
            MarketStatus::Failed { kind, .. } => assert_eq!(*kind, FailureKind::NotFound),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn extended_row_fills_identifiers_and_placeholders() {
        let schema = FieldSchema::extended();
        let row = assemble(&schema, &ticker("AAPL"), &good_snapshot(&schema), &found_lookup());

        assert_eq!(row.cells.len(), schema.len());
        assert_eq!(row.get(&schema, "sec_cik"), Some(&Cell::Text("0000320193".to_string())));
        assert_eq!(
            row.get(&schema, "sec_accession"),
            Some(&Cell::Text("0000320193-24-000123".to_string()))
        );
        assert_eq!(row.get(&schema, "net_debt_to_ebitda"), Some(&Cell::Number(22.1)));
        assert_eq!(row.get(&schema, "total_assets"), Some(&Cell::Null));
        assert_eq!(row.get(&schema, "interest_paid"), Some(&Cell::Null));
    }

    #[test]
    fn unknown_column_is_none() {
        let schema = FieldSchema::raw();
        let row = assemble(&schema, &ticker("AAPL"), &good_snapshot(&schema), &found_lookup());
        assert!(row.get(&schema, "no_such_column").is_none());
    }

    #[test]
    fn strings_render_nulls_empty() {
        let schema = FieldSchema::raw();
        let row = assemble(&schema, &ticker("AAPL"), &good_snapshot(&schema), &found_lookup());
        let strings = row.to_strings();
        assert_eq!(strings[0], "AAPL");
        assert_eq!(strings[9], "");
        assert_eq!(strings.last().map(String::as_str), Some("True"));
    }
}
