//! Result table, run summary and CSV export.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::ScreenerError;
use crate::row::Row;
use crate::schema::FieldSchema;

/// Counts shown under the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total_tickers: usize,
    pub market_success: usize,
    pub filings_found: usize,
}

/// A CSV document and the file name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
}

/// Rows accumulated in processing order, all shaped by one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    schema: FieldSchema,
    rows: Vec<Row>,
}

impl ResultTable {
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(schema: FieldSchema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.schema.column_names()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Counts over the typed statuses, never over display text.
    pub fn summary(&self) -> Summary {
        Summary {
            total_tickers: self.rows.len(),
            market_success: self
                .rows
                .iter()
                .filter(|r| r.market_status.is_success())
                .count(),
            filings_found: self
                .rows
                .iter()
                .filter(|r| r.filing_status.is_found())
                .count(),
        }
    }

    /// Header plus one record per row, `\n` terminated.
    pub fn to_csv(&self) -> Result<String, ScreenerError> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        wtr.write_record(self.columns())?;
        for row in &self.rows {
            wtr.write_record(row.to_strings())?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ScreenerError::Csv(csv::Error::from(e.into_error())))?;
        // every field was written from a String
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn export(&self, captured_at: &DateTime<Local>) -> Result<CsvExport, ScreenerError> {
        Ok(CsvExport {
            file_name: csv_file_name(captured_at),
            contents: self.to_csv()?,
        })
    }
}

/// `raw_data_YYYYmmdd_HHMMSS.csv` for the capture time.
pub fn csv_file_name(captured_at: &DateTime<Local>) -> String {
    format!("raw_data_{}.csv", captured_at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::schema::{ColumnSource, ColumnSpec, RegistryKey};
    use crate::status::{FailureKind, FilingStatus, MarketStatus};
    use crate::tickers::Ticker;
    use chrono::TimeZone;

    fn small_schema() -> FieldSchema {
        FieldSchema::new(
            vec![
                ColumnSpec::new("ticker", ColumnSource::Ticker),
                ColumnSpec::new("yahoo_status", ColumnSource::MarketStatus),
                ColumnSpec::new("sec_status", ColumnSource::FilingStatus),
                ColumnSpec::new("market_cap", ColumnSource::Provider("marketCap")),
            ],
            RegistryKey::Ticker,
        )
    }

    fn row(symbol: &str, market: MarketStatus, filing: FilingStatus, cap: Cell) -> Row {
        Row {
            ticker: Ticker::parse(symbol).unwrap(),
            cells: vec![
                Cell::Text(symbol.to_string()),
                Cell::Text(market.label()),
                Cell::Text(filing.label()),
                cap,
            ],
            market_status: market,
            filing_status: filing,
        }
    }

    fn sample_table() -> ResultTable {
        ResultTable::with_rows(
            small_schema(),
            vec![
                row("AAPL", MarketStatus::Success, FilingStatus::Found, Cell::Integer(3000)),
                row(
                    "MSFT",
                    MarketStatus::Success,
                    FilingStatus::unavailable("HTTP 503"),
                    Cell::Integer(2800),
                ),
                row(
                    "ZZZZ",
                    MarketStatus::failed(FailureKind::NotFound, "Ticker not found"),
                    FilingStatus::NotFound,
                    Cell::Null,
                ),
            ],
        )
    }

    #[test]
    fn summary_counts_exact_statuses() {
        let summary = sample_table().summary();
        assert_eq!(
            summary,
            Summary {
                total_tickers: 3,
                market_success: 2,
                filings_found: 1,
            }
        );
    }

    #[test]
    fn failure_text_containing_success_is_not_counted() {
        let table = ResultTable::with_rows(
            small_schema(),
            vec![row(
                "ODD",
                MarketStatus::failed(FailureKind::Malformed, "success expected"),
                FilingStatus::failed(FailureKind::Malformed, "found nothing"),
                Cell::Null,
            )],
        );
        let summary = table.summary();
        assert_eq!(summary.market_success, 0);
        assert_eq!(summary.filings_found, 0);
    }

    #[test]
    fn csv_layout() {
        let csv = sample_table().to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ticker,yahoo_status,sec_status,market_cap");
        assert_eq!(lines[1], "AAPL,success,found,3000");
        assert_eq!(lines[2], "MSFT,success,unavailable: HTTP 503,2800");
        assert_eq!(lines[3], "ZZZZ,error: Ticker not found,not found,");
        assert!(csv.ends_with('\n'));
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let table = ResultTable::with_rows(
            small_schema(),
            vec![row(
                "BRK.B",
                MarketStatus::failed(FailureKind::Unavailable, "HTTP 500: a, b"),
                FilingStatus::Found,
                Cell::Text("say \"hi\"".to_string()),
            )],
        );
        let csv = table.to_csv().unwrap();
        let record = csv.lines().nth(1).unwrap();
        assert_eq!(record, "BRK.B,\"error: HTTP 500: a, b\",found,\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_keeps_non_ascii_text() {
        let table = ResultTable::with_rows(
            small_schema(),
            vec![row(
                "SAN.PA",
                MarketStatus::Success,
                FilingStatus::unavailable("délai dépassé"),
                Cell::Text("Société Générale".to_string()),
            )],
        );
        let csv = table.to_csv().unwrap();
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "SAN.PA,success,unavailable: délai dépassé,Société Générale"
        );
        assert!(!csv.contains('\u{FFFD}'));
    }

    #[test]
    fn csv_is_deterministic() {
        let table = sample_table();
        assert_eq!(table.to_csv().unwrap(), table.to_csv().unwrap());
    }

    #[test]
    fn empty_table_is_header_only() {
        let table = ResultTable::new(small_schema());
        assert!(table.is_empty());
        assert_eq!(table.summary(), Summary::default());
        assert_eq!(table.to_csv().unwrap(), "ticker,yahoo_status,sec_status,market_cap\n");
    }

    #[test]
    fn file_name_from_capture_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(csv_file_name(&at), "raw_data_20240309_140507.csv");
    }

    #[test]
    fn export_differs_only_in_name() {
        let table = sample_table();
        let first = table
            .export(&Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap())
            .unwrap();
        let second = table
            .export(&Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 8).unwrap())
            .unwrap();
        assert_eq!(first.contents, second.contents);
        assert_ne!(first.file_name, second.file_name);
    }
}
