//! Data-driven column schema.
//!
//! A schema is the ordered list of output columns and where each one comes
//! from. Market columns are plain `{column: provider key}` copies; the
//! assembler never interprets a key beyond looking it up.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ScreenerError;

/// Provider key used for the live quote price.
pub const CURRENT_PRICE_KEY: &str = "currentPrice";

/// Reference formulas for the metrics downstream analysis derives from the
/// raw columns. Documentation only; nothing here is computed.
pub const METRIC_DEFINITIONS: &[(&str, &str)] = &[
    ("Levered_FCF", "CFO - CapEx - Net Debt Repayment"),
    ("EPS_Growth", "(EPS_TTM / EPS_prior_year_TTM) - 1"),
    ("CROIC", "FCF / (Total Debt + Total Equity - Cash)"),
    ("Risk_Free_Rate", "4.5%"),
    ("MA_200", "Daily closing prices"),
];

/// Where a column's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Ticker,
    MarketStatus,
    FilingStatus,
    FilingDate,
    FilingAccession,
    FilingCik,
    /// Live quote price, falling back to the latest daily close.
    CurrentPrice,
    /// Verbatim copy of a provider field.
    Provider(&'static str),
    DailyClosesAvailable,
    /// Reserved for statement line items; always null.
    Placeholder,
}

impl fmt::Display for ColumnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSource::Ticker => f.write_str("ticker"),
            ColumnSource::MarketStatus => f.write_str("yahoo status"),
            ColumnSource::FilingStatus => f.write_str("sec status"),
            ColumnSource::FilingDate => f.write_str("sec filingDate"),
            ColumnSource::FilingAccession => f.write_str("sec accessionNumber"),
            ColumnSource::FilingCik => f.write_str("sec cik"),
            ColumnSource::CurrentPrice => write!(f, "yahoo {} | last close", CURRENT_PRICE_KEY),
            ColumnSource::Provider(key) => write!(f, "yahoo {}", key),
            ColumnSource::DailyClosesAvailable => f.write_str("yahoo chart (1y daily)"),
            ColumnSource::Placeholder => f.write_str("placeholder"),
        }
    }
}

/// One named output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub source: ColumnSource,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, source: ColumnSource) -> Self {
        Self { name, source }
    }
}

/// How the filings registry is keyed for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKey {
    /// Use the ticker symbol directly as the company key.
    Ticker,
    /// Try to resolve the ticker to a CIK first; fall back to the ticker.
    ResolveCik,
}

/// Ordered column list plus the registry key mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    columns: Vec<ColumnSpec>,
    registry_key: RegistryKey,
}

impl FieldSchema {
    pub fn new(columns: Vec<ColumnSpec>, registry_key: RegistryKey) -> Self {
        Self {
            columns,
            registry_key,
        }
    }

    /// The 24-column layout of the raw data export.
    pub fn raw() -> Self {
        Self::new(base_columns(), RegistryKey::Ticker)
    }

    /// The raw layout plus filing identifiers, extra provider fields and the
    /// statement placeholders.
    pub fn extended() -> Self {
        use ColumnSource::*;
        let mut columns = base_columns();
        // filing identifiers sit right after the filing date
        let at = columns
            .iter()
            .position(|c| c.source == FilingDate)
            .map(|i| i + 1)
            .unwrap_or(columns.len());
        let tail = columns.split_off(at);
        columns.extend([
            ColumnSpec::new("sec_cik", FilingCik),
            ColumnSpec::new("sec_accession", FilingAccession),
        ]);
        columns.extend(tail);
        columns.extend([
            ColumnSpec::new("operating_margin", Provider("operatingMargins")),
            ColumnSpec::new("free_cash_flow", Provider("freeCashflow")),
            ColumnSpec::new("total_cash", Provider("totalCash")),
            ColumnSpec::new("ebitda", Provider("ebitda")),
            ColumnSpec::new("net_debt_to_ebitda", Provider("enterpriseToEbitda")),
            ColumnSpec::new("beta", Provider("beta")),
            ColumnSpec::new("total_assets", Placeholder),
            ColumnSpec::new("total_liabilities", Placeholder),
            ColumnSpec::new("total_equity", Placeholder),
            ColumnSpec::new("operating_cash_flow", Placeholder),
            ColumnSpec::new("capital_expenditure", Placeholder),
            ColumnSpec::new("short_term_debt", Placeholder),
            ColumnSpec::new("long_term_debt", Placeholder),
            ColumnSpec::new("interest_paid", Placeholder),
        ]);
        Self::new(columns, RegistryKey::ResolveCik)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn registry_key(&self) -> RegistryKey {
        self.registry_key
    }

    /// Distinct provider keys the market fetcher has to extract, in column order.
    /// Always includes the live price key.
    pub fn provider_keys(&self) -> Vec<&'static str> {
        let mut keys = vec![CURRENT_PRICE_KEY];
        for column in &self.columns {
            if let ColumnSource::Provider(key) = column.source {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::raw()
    }
}

fn base_columns() -> Vec<ColumnSpec> {
    use ColumnSource::*;
    vec![
        ColumnSpec::new("ticker", Ticker),
        ColumnSpec::new("yahoo_status", MarketStatus),
        ColumnSpec::new("sec_status", FilingStatus),
        ColumnSpec::new("sec_filing_date", FilingDate),
        ColumnSpec::new("current_price", CurrentPrice),
        ColumnSpec::new("market_cap", Provider("marketCap")),
        ColumnSpec::new("shares_outstanding", Provider("sharesOutstanding")),
        ColumnSpec::new("trailing_pe", Provider("trailingPE")),
        ColumnSpec::new("eps_ttm", Provider("trailingEps")),
        ColumnSpec::new("dividend_yield", Provider("dividendYield")),
        ColumnSpec::new("book_value", Provider("bookValue")),
        ColumnSpec::new("pb_ratio", Provider("priceToBook")),
        ColumnSpec::new("gross_margin", Provider("grossMargins")),
        ColumnSpec::new("net_margin", Provider("profitMargins")),
        ColumnSpec::new("roa", Provider("returnOnAssets")),
        ColumnSpec::new("roe", Provider("returnOnEquity")),
        ColumnSpec::new("revenue_ttm", Provider("totalRevenue")),
        ColumnSpec::new("net_income_ttm", Provider("netIncomeToCommon")),
        ColumnSpec::new("total_debt", Provider("totalDebt")),
        ColumnSpec::new("debt_to_equity", Provider("debtToEquity")),
        ColumnSpec::new("price_52w_high", Provider("fiftyTwoWeekHigh")),
        ColumnSpec::new("price_52w_low", Provider("fiftyTwoWeekLow")),
        ColumnSpec::new("avg_volume", Provider("averageVolume")),
        ColumnSpec::new("daily_closes_available", DailyClosesAvailable),
    ]
}

/// Named schema presets selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaPreset {
    #[default]
    Raw,
    Extended,
}

impl SchemaPreset {
    pub fn schema(self) -> FieldSchema {
        match self {
            SchemaPreset::Raw => FieldSchema::raw(),
            SchemaPreset::Extended => FieldSchema::extended(),
        }
    }
}

impl FromStr for SchemaPreset {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(SchemaPreset::Raw),
            "extended" | "ext" => Ok(SchemaPreset::Extended),
            other => Err(ScreenerError::InvalidInput(format!(
                "unknown schema '{}', expected raw or extended",
                other
            ))),
        }
    }
}

impl fmt::Display for SchemaPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaPreset::Raw => f.write_str("raw"),
            SchemaPreset::Extended => f.write_str("extended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn raw_column_order() {
        let names = FieldSchema::raw().column_names();
        assert_eq!(names.len(), 24);
        assert_eq!(&names[..5], &["ticker", "yahoo_status", "sec_status", "sec_filing_date", "current_price"]);
        assert_eq!(names.last(), Some(&"daily_closes_available"));
    }

    #[test]
    fn metric_definitions_are_named_once() {
        let names: HashSet<_> = METRIC_DEFINITIONS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), METRIC_DEFINITIONS.len());
        assert!(METRIC_DEFINITIONS
            .iter()
            .any(|(name, formula)| *name == "CROIC" && formula.starts_with("FCF /")));
    }

    #[test]
    fn column_names_are_unique() {
        for schema in [FieldSchema::raw(), FieldSchema::extended()] {
            let names = schema.column_names();
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len());
        }
    }

    #[test]
    fn extended_is_superset_of_raw() {
        let raw = FieldSchema::raw().column_names();
        let ext = FieldSchema::extended().column_names();
        for name in &raw {
            assert!(ext.contains(name), "missing {}", name);
        }
        assert_eq!(ext[4], "sec_cik");
        assert_eq!(ext[5], "sec_accession");
    }

    #[test]
    fn extended_net_debt_to_ebitda_copies_provider_key() {
        let schema = FieldSchema::extended();
        let column = schema
            .columns()
            .iter()
            .find(|c| c.name == "net_debt_to_ebitda")
            .unwrap();
        assert_eq!(column.source, ColumnSource::Provider("enterpriseToEbitda"));
    }

    #[test]
    fn registry_key_modes() {
        assert_eq!(FieldSchema::raw().registry_key(), RegistryKey::Ticker);
        assert_eq!(FieldSchema::extended().registry_key(), RegistryKey::ResolveCik);
    }

    #[test]
    fn provider_keys_start_with_price_and_are_distinct() {
        let keys = FieldSchema::raw().provider_keys();
        assert_eq!(keys[0], CURRENT_PRICE_KEY);
        assert!(keys.contains(&"marketCap"));
        assert!(keys.contains(&"averageVolume"));
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn preset_from_str() {
        assert_eq!("RAW".parse::<SchemaPreset>().unwrap(), SchemaPreset::Raw);
        assert_eq!("extended".parse::<SchemaPreset>().unwrap(), SchemaPreset::Extended);
        assert!("wide".parse::<SchemaPreset>().is_err());
    }
}
