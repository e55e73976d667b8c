//! SEC EDGAR client for most-recent annual filing (10-K) metadata.
//!
//! Only the filing date, accession number and availability are looked up.
//! Statement line items inside the filing are not parsed.

pub mod client;
pub mod error;
pub mod types;

pub use client::EdgarClient;
pub use error::EdgarError;
pub use types::FilingLookup;
