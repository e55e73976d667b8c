//! Library layer for stockscreen: ticker parsing, market and filing fetchers,
//! row assembly, and CSV export.
//!
//! A run parses free-form input into a [`TickerSet`], fetches a Yahoo Finance
//! snapshot and an SEC EDGAR filing lookup per ticker, flattens both into a
//! [`Row`] shaped by a [`FieldSchema`], and collects the rows into a
//! [`ResultTable`].

pub mod cell;
pub mod edgar;
pub mod error;
mod http;
pub mod pipeline;
pub mod row;
pub mod schema;
pub mod status;
pub mod table;
pub mod tickers;
mod user_agent;
pub mod yahoo;

pub use cell::Cell;
pub use edgar::{EdgarClient, EdgarError, FilingLookup};
pub use error::ScreenerError;
pub use pipeline::{Collector, NoProgress, ProgressReporter};
pub use row::{assemble, Row};
pub use schema::{
    ColumnSource, ColumnSpec, FieldSchema, RegistryKey, SchemaPreset, METRIC_DEFINITIONS,
};
pub use status::{FailureKind, FilingStatus, MarketStatus, MAX_STATUS_MESSAGE};
pub use table::{csv_file_name, CsvExport, ResultTable, Summary};
pub use tickers::{parse_tickers, Ticker, TickerSet};
pub use yahoo::{MarketSnapshot, YahooClient, YahooError};
