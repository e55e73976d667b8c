//! Yahoo Finance HTTP client.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use url::Url;

use super::error::YahooError;
use super::types::{ChartResponse, MarketSnapshot, QuoteSummaryResponse, QUOTE_SUMMARY_MODULES};
use crate::http::snippet;
use crate::tickers::Ticker;
use crate::user_agent::get_user_agent;

/// Request timeout for Yahoo Finance calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";

/// Yahoo Finance client for quote summaries and one-year daily history.
///
/// The quote summary endpoint wants a session crumb. One is fetched lazily on
/// first use and reused for the client's lifetime; if none can be obtained the
/// requests go out without it.
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
    cookie_url: Option<String>,
    crumb: OnceCell<Option<String>>,
}

impl YahooClient {
    /// Create a new YahooClient against the production API.
    pub fn new() -> Result<Self, YahooError> {
        Ok(Self {
            client: build_http(REQUEST_TIMEOUT)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_url: Some(DEFAULT_COOKIE_URL.to_string()),
            crumb: OnceCell::new(),
        })
    }

    /// Create a new YahooClient with custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str) -> Result<Self, YahooError> {
        Ok(Self {
            client: build_http(REQUEST_TIMEOUT)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_url: None,
            crumb: OnceCell::new(),
        })
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, YahooError> {
        self.client = build_http(timeout)?;
        Ok(self)
    }

    /// Fetch the snapshot for `ticker`, extracting `keys` from the quote summary.
    ///
    /// Never fails: any error yields a snapshot with null data and a failed status.
    /// The history request is skipped when the quote request already failed.
    pub async fn fetch_snapshot(&self, ticker: &Ticker, keys: &[&str]) -> MarketSnapshot {
        let fields = match self.get_quote_fields(ticker.as_str()).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!("[{}] quote summary failed: {}", ticker, e);
                return MarketSnapshot::failed(ticker.clone(), &e);
            }
        };
        let closes = match self.get_daily_closes(ticker.as_str()).await {
            Ok(closes) => closes,
            Err(e) => {
                tracing::warn!("[{}] price history failed: {}", ticker, e);
                return MarketSnapshot::failed(ticker.clone(), &e);
            }
        };
        tracing::debug!(
            "[{}] {} quote fields, {} daily closes",
            ticker,
            fields.len(),
            closes.len()
        );
        MarketSnapshot::from_parts(ticker.clone(), keys, &fields, &closes)
    }

    /// Quote summary fields for `symbol`, flattened across modules.
    pub async fn get_quote_fields(&self, symbol: &str) -> Result<HashMap<String, Value>, YahooError> {
        let url = self.endpoint(&["v10", "finance", "quoteSummary"], symbol)?;
        let mut params = vec![("modules", QUOTE_SUMMARY_MODULES.join(","))];
        if let Some(crumb) = self.crumb().await {
            params.push(("crumb", crumb.to_string()));
        }
        let resp: QuoteSummaryResponse = self.get(url, &params).await?;
        resp.into_fields()
    }

    /// One year of daily closes for `symbol`, oldest first.
    pub async fn get_daily_closes(&self, symbol: &str) -> Result<Vec<f64>, YahooError> {
        let url = self.endpoint(&["v8", "finance", "chart"], symbol)?;
        let params = [("range", "1y".to_string()), ("interval", "1d".to_string())];
        let resp: ChartResponse = self.get(url, &params).await?;
        resp.into_closes()
    }

    async fn crumb(&self) -> Option<&str> {
        self.crumb
            .get_or_init(|| self.fetch_crumb())
            .await
            .as_deref()
    }

    async fn fetch_crumb(&self) -> Option<String> {
        if let Some(cookie_url) = &self.cookie_url {
            // only the session cookie matters; the response itself is usually a 404
            if let Err(e) = self.client.get(cookie_url).send().await {
                tracing::debug!("Yahoo cookie request failed: {}", e);
            }
        }
        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!("Yahoo crumb request returned HTTP {}", r.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("Yahoo crumb request failed: {}", e);
                return None;
            }
        };
        let body = response.text().await.ok()?;
        let crumb = body.trim();
        if crumb.is_empty() || crumb.len() >= 100 || crumb.contains(' ') || crumb.contains('<') {
            tracing::debug!("Yahoo crumb response rejected");
            return None;
        }
        Some(crumb.to_string())
    }

    fn endpoint(&self, segments: &[&str], symbol: &str) -> Result<Url, YahooError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| YahooError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| YahooError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments)
            .push(symbol);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, YahooError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(YahooError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(YahooError::NotFound);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(YahooError::HttpStatus {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            YahooError::ParseFailed(format!("{} | body: {}", e, snippet(&body)))
        })
    }
}

fn build_http(timeout: Duration) -> Result<reqwest::Client, YahooError> {
    let client = reqwest::Client::builder()
        .user_agent(get_user_agent())
        .cookie_store(true)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
