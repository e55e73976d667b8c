//! Yahoo Finance client for quote-summary fundamentals and daily price history.
//!
//! One [`MarketSnapshot`] per ticker: the schema's provider fields, the current
//! price (falling back to the last daily close), whether a one-year daily close
//! series exists, and a typed status.

pub mod client;
pub mod error;
pub mod types;

pub use client::YahooClient;
pub use error::YahooError;
pub use types::MarketSnapshot;
