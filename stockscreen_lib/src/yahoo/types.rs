//! Response types for the Yahoo Finance endpoints and the snapshot record.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::cell::Cell;
use crate::status::MarketStatus;
use crate::tickers::Ticker;

use super::error::YahooError;

/// Quote summary modules requested per ticker, in lookup precedence order.
pub const QUOTE_SUMMARY_MODULES: &[&str] = &[
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
];

// ============================================================================
// quoteSummary
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSummaryBody {
    #[serde(default)]
    pub result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Error object Yahoo embeds in otherwise well-formed bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("not found"))
    }

    pub fn message(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Flatten the per-module objects of one quote summary result into a single
/// `key -> scalar` map.
///
/// Yahoo wraps most numbers as `{"raw": 1.5, "fmt": "1.50"}`; only `raw` is
/// kept. Empty wrappers (`{}`) become null. Earlier modules in `modules` win
/// when a key appears more than once.
pub fn flatten_modules(result: &Map<String, Value>, modules: &[&str]) -> HashMap<String, Value> {
    let mut out = HashMap::new();
    for module in modules {
        let Some(Value::Object(fields)) = result.get(*module) else {
            continue;
        };
        for (key, value) in fields {
            if out.contains_key(key) {
                continue;
            }
            let scalar = match value {
                Value::Object(wrapper) => match wrapper.get("raw") {
                    Some(raw) => raw.clone(),
                    None if wrapper.is_empty() => Value::Null,
                    None => continue,
                },
                Value::Array(_) => continue,
                other => other.clone(),
            };
            out.insert(key.clone(), scalar);
        }
    }
    out
}

impl QuoteSummaryResponse {
    /// Extract the flattened field map of the first result.
    pub fn into_fields(self) -> Result<HashMap<String, Value>, YahooError> {
        if let Some(err) = self.quote_summary.error {
            if err.is_not_found() {
                return Err(YahooError::NotFound);
            }
            return Err(YahooError::HttpStatus {
                status: 200,
                body: err.message(),
            });
        }
        let result = self
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or(YahooError::NotFound)?;
        Ok(flatten_modules(&result, QUOTE_SUMMARY_MODULES))
    }
}

// ============================================================================
// chart (daily history)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Daily closes in chronological order, gaps dropped.
    pub fn into_closes(self) -> Result<Vec<f64>, YahooError> {
        if let Some(err) = self.chart.error {
            if err.is_not_found() {
                return Err(YahooError::NotFound);
            }
            return Err(YahooError::HttpStatus {
                status: 200,
                body: err.message(),
            });
        }
        let closes = self
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .and_then(|r| r.indicators.quote.into_iter().next())
            .map(|q| q.close.into_iter().flatten().collect())
            .unwrap_or_default();
        Ok(closes)
    }
}

// ============================================================================
// MarketSnapshot
// ============================================================================

static NULL_CELL: Cell = Cell::Null;

/// Market data for one ticker at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub ticker: Ticker,
    pub status: MarketStatus,
    /// Values keyed by provider key; only keys the schema asked for.
    pub values: HashMap<String, Cell>,
    /// Live quote price, else the most recent daily close.
    pub current_price: Option<f64>,
    pub daily_closes_available: bool,
}

impl MarketSnapshot {
    /// Build a successful snapshot from the flattened quote fields and the
    /// daily close series.
    pub fn from_parts(
        ticker: Ticker,
        keys: &[&str],
        fields: &HashMap<String, Value>,
        closes: &[f64],
    ) -> Self {
        let values = keys
            .iter()
            .map(|key| {
                let cell = fields.get(*key).map(Cell::from_json).unwrap_or_default();
                (key.to_string(), cell)
            })
            .collect::<HashMap<_, _>>();
        let current_price = fields
            .get(crate::schema::CURRENT_PRICE_KEY)
            .and_then(Value::as_f64)
            .or_else(|| closes.last().copied());
        Self {
            ticker,
            status: MarketStatus::Success,
            values,
            current_price,
            daily_closes_available: !closes.is_empty(),
        }
    }

    /// A snapshot with every data field null.
    pub fn failed(ticker: Ticker, error: &YahooError) -> Self {
        Self {
            ticker,
            status: MarketStatus::failed(error.kind(), error.status_message()),
            values: HashMap::new(),
            current_price: None,
            daily_closes_available: false,
        }
    }

    /// Value for a provider key; null when the key was absent or not requested.
    pub fn value(&self, key: &str) -> &Cell {
        self.values.get(key).unwrap_or(&NULL_CELL)
    }
}
