//! SEC EDGAR HTTP client.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use super::error::EdgarError;
use super::types::{build_cik_table, BrowseResponse, CompanyTickerEntry, FilingEntry, FilingLookup};
use crate::http::snippet;
use crate::schema::RegistryKey;
use crate::status::FilingStatus;
use crate::tickers::Ticker;

/// Request timeout for SEC EDGAR calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// SEC asks automated clients to identify themselves with a contact address.
pub const DEFAULT_USER_AGENT: &str = "stockscreen/0.1 stockscreen@example.com";

const DEFAULT_BASE_URL: &str = "https://www.sec.gov";

/// SEC EDGAR client for annual filing metadata.
pub struct EdgarClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    /// Ticker -> CIK table, downloaded at most once per client.
    cik_table: OnceCell<Option<HashMap<String, String>>>,
}

impl EdgarClient {
    /// Create a new EdgarClient against www.sec.gov.
    pub fn new(user_agent: &str) -> Result<Self, EdgarError> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent)
    }

    /// Create a new EdgarClient with custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self, EdgarError> {
        Ok(Self {
            client: build_http(user_agent, REQUEST_TIMEOUT)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
            cik_table: OnceCell::new(),
        })
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, EdgarError> {
        self.client = build_http(&self.user_agent, timeout)?;
        Ok(self)
    }

    /// Look up the most recent annual filing for `ticker`.
    ///
    /// Never fails: provider errors become the lookup's status and leave every
    /// data field null.
    pub async fn lookup_filing(&self, ticker: &Ticker, mode: RegistryKey) -> FilingLookup {
        let cik = match mode {
            RegistryKey::Ticker => None,
            RegistryKey::ResolveCik => self.resolve_cik(ticker).await,
        };
        let company_key = cik.as_deref().unwrap_or(ticker.as_str());

        match self.latest_annual_filing(company_key).await {
            Ok(Some(entry)) => {
                tracing::debug!("[{}] latest 10-K filed {:?}", ticker, entry.filing_date);
                FilingLookup::found(ticker.clone(), entry, cik)
            }
            Ok(None) => {
                tracing::debug!("[{}] no 10-K filings listed", ticker);
                FilingLookup::empty(ticker.clone(), FilingStatus::NotFound, cik)
            }
            Err(e) => {
                tracing::warn!("[{}] filing lookup failed: {}", ticker, e);
                FilingLookup::empty(ticker.clone(), e.to_status(), cik)
            }
        }
    }

    /// Best-effort ticker -> CIK resolution. Any failure yields `None`.
    pub async fn resolve_cik(&self, ticker: &Ticker) -> Option<String> {
        let table = self
            .cik_table
            .get_or_init(|| async {
                match self.get_company_tickers().await {
                    Ok(table) => Some(table),
                    Err(e) => {
                        tracing::debug!("CIK table unavailable, keying by ticker: {}", e);
                        None
                    }
                }
            })
            .await
            .as_ref()?;
        let cik = table.get(ticker.as_str()).cloned();
        if cik.is_none() {
            tracing::debug!("[{}] no CIK mapping, keying by ticker", ticker);
        }
        cik
    }

    /// Ticker -> CIK table from `files/company_tickers.json`.
    pub async fn get_company_tickers(&self) -> Result<HashMap<String, String>, EdgarError> {
        let url = format!("{}/files/company_tickers.json", self.base_url);
        let raw: HashMap<String, CompanyTickerEntry> = self.get(&url, &[]).await?;
        Ok(build_cik_table(raw))
    }

    /// Most recent 10-K listed for `company_key` (a ticker or CIK).
    pub async fn latest_annual_filing(
        &self,
        company_key: &str,
    ) -> Result<Option<FilingEntry>, EdgarError> {
        let url = format!("{}/cgi-bin/browse-edgar", self.base_url);
        let params = [
            ("action", "getcompany"),
            ("CIK", company_key),
            ("type", "10-K"),
            ("dateb", ""),
            ("owner", "exclude"),
            ("count", "1"),
            ("output", "json"),
        ];
        let resp: BrowseResponse = self.get(&url, &params).await?;
        Ok(resp.into_first())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, EdgarError> {
        let url = reqwest::Url::parse(url).map_err(|e| EdgarError::InvalidUrl(e.to_string()))?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(EdgarError::HttpStatus {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            EdgarError::ParseFailed(format!("{} | body: {}", e, snippet(&body)))
        })
    }
}

fn build_http(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, EdgarError> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
