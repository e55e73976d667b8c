//! Collection pipeline: tickers in, result table out.
//!
//! Each ticker is fetched from Yahoo Finance and SEC EDGAR, assembled into a
//! row and appended to the table. A provider failure is recorded on that
//! ticker's row and never stops the run.
//!
//! `collect_concurrent` uses the Semaphore + JoinSet + mpsc pattern: workers
//! send progress events over a channel and the caller's task drives the
//! [`ProgressReporter`], so reporters never cross task boundaries.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::edgar::{EdgarClient, FilingLookup};
use crate::error::ScreenerError;
use crate::row::{assemble, Row};
use crate::schema::FieldSchema;
use crate::status::{FailureKind, FilingStatus, MarketStatus};
use crate::table::{ResultTable, Summary};
use crate::tickers::{Ticker, TickerSet};
use crate::yahoo::{MarketSnapshot, YahooClient};

const WORKER_FAILED: &str = "worker task failed";

/// Receives progress notifications while a run is in flight.
pub trait ProgressReporter: Send + Sync {
    fn started(&self, _total: usize) {}
    /// `index` is zero-based.
    fn ticker_started(&self, _ticker: &Ticker, _index: usize, _total: usize) {}
    fn ticker_finished(&self, _row: &Row) {}
    fn finished(&self, _summary: &Summary) {}
}

/// Reporter that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

enum WorkerEvent {
    Started(usize, Ticker),
    Finished(usize, Row),
}

/// Drives the per-ticker fetch and assembly for one run configuration.
pub struct Collector {
    yahoo: Arc<YahooClient>,
    edgar: Arc<EdgarClient>,
    schema: Arc<FieldSchema>,
}

impl Collector {
    pub fn new(yahoo: YahooClient, edgar: EdgarClient, schema: FieldSchema) -> Self {
        Self {
            yahoo: Arc::new(yahoo),
            edgar: Arc::new(edgar),
            schema: Arc::new(schema),
        }
    }

    /// Process every ticker one at a time, in set order.
    pub async fn collect(
        &self,
        tickers: &TickerSet,
        progress: &dyn ProgressReporter,
    ) -> Result<ResultTable, ScreenerError> {
        if tickers.is_empty() {
            return Err(ScreenerError::NoTickers);
        }
        let total = tickers.len();
        tracing::info!("Collecting {} ticker(s): {}", total, tickers.joined());
        progress.started(total);

        let mut table = ResultTable::new(FieldSchema::clone(&self.schema));
        for (index, ticker) in tickers.iter().enumerate() {
            progress.ticker_started(ticker, index, total);
            let row = process_ticker(&self.yahoo, &self.edgar, &self.schema, ticker).await;
            progress.ticker_finished(&row);
            table.push(row);
        }

        self.finish(table, progress)
    }

    /// Process up to `concurrency` tickers at once. Rows come back in set
    /// order regardless of completion order. The worker count is capped at
    /// the number of tickers.
    pub async fn collect_concurrent(
        &self,
        tickers: &TickerSet,
        concurrency: usize,
        progress: &dyn ProgressReporter,
    ) -> Result<ResultTable, ScreenerError> {
        if concurrency <= 1 {
            return self.collect(tickers, progress).await;
        }
        if tickers.is_empty() {
            return Err(ScreenerError::NoTickers);
        }
        let total = tickers.len();
        let workers = concurrency.min(total);
        tracing::info!(
            "Collecting {} ticker(s) with {} worker(s): {}",
            total,
            workers,
            tickers.joined()
        );
        progress.started(total);

        let semaphore = Arc::new(Semaphore::new(workers));
        let (tx, mut rx) = mpsc::channel::<WorkerEvent>(workers.saturating_mul(2));
        let mut join_set = JoinSet::new();

        for (index, ticker) in tickers.iter().cloned().enumerate() {
            let sem = Arc::clone(&semaphore);
            let sender = tx.clone();
            let yahoo = Arc::clone(&self.yahoo);
            let edgar = Arc::clone(&self.edgar);
            let schema = Arc::clone(&self.schema);

            join_set.spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return;
                };
                let _ = sender.send(WorkerEvent::Started(index, ticker.clone())).await;
                let row = process_ticker(&yahoo, &edgar, &schema, &ticker).await;
                let _ = sender.send(WorkerEvent::Finished(index, row)).await;
            });
        }
        drop(tx);

        let mut indexed: Vec<(usize, Row)> = Vec::with_capacity(total);
        while let Some(event) = rx.recv().await {
            match event {
                WorkerEvent::Started(index, ticker) => progress.ticker_started(&ticker, index, total),
                WorkerEvent::Finished(index, row) => {
                    progress.ticker_finished(&row);
                    indexed.push((index, row));
                }
            }
        }
        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Worker task failed: {}", e);
            }
        }

        let ordered: Vec<Ticker> = tickers.iter().cloned().collect();
        let rows = complete_rows(&self.schema, &ordered, indexed);
        let table = ResultTable::with_rows(FieldSchema::clone(&self.schema), rows);
        self.finish(table, progress)
    }

    fn finish(
        &self,
        table: ResultTable,
        progress: &dyn ProgressReporter,
    ) -> Result<ResultTable, ScreenerError> {
        if table.is_empty() {
            return Err(ScreenerError::NoData);
        }
        let summary = table.summary();
        tracing::info!(
            "Collected {} row(s): {} market ok, {} filings found",
            summary.total_tickers,
            summary.market_success,
            summary.filings_found
        );
        progress.finished(&summary);
        Ok(table)
    }
}

async fn process_ticker(
    yahoo: &YahooClient,
    edgar: &EdgarClient,
    schema: &FieldSchema,
    ticker: &Ticker,
) -> Row {
    let keys = schema.provider_keys();
    let snapshot = yahoo.fetch_snapshot(ticker, &keys).await;
    let lookup = edgar.lookup_filing(ticker, schema.registry_key()).await;
    assemble(schema, ticker, &snapshot, &lookup)
}

/// Put rows in ticker order. A ticker whose worker never reported a row
/// gets a row with both providers marked unavailable.
fn complete_rows(schema: &FieldSchema, ordered: &[Ticker], indexed: Vec<(usize, Row)>) -> Vec<Row> {
    let mut slots: Vec<Option<Row>> = vec![None; ordered.len()];
    for (index, row) in indexed {
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(row);
        }
    }
    slots
        .into_iter()
        .zip(ordered)
        .map(|(slot, ticker)| {
            slot.unwrap_or_else(|| {
                tracing::warn!("No row reported for {}", ticker);
                worker_failure_row(schema, ticker)
            })
        })
        .collect()
}

fn worker_failure_row(schema: &FieldSchema, ticker: &Ticker) -> Row {
    let snapshot = MarketSnapshot {
        ticker: ticker.clone(),
        status: MarketStatus::failed(FailureKind::Unavailable, WORKER_FAILED),
        values: HashMap::new(),
        current_price: None,
        daily_closes_available: false,
    };
    let lookup = FilingLookup::empty(
        ticker.clone(),
        FilingStatus::failed(FailureKind::Unavailable, WORKER_FAILED),
        None,
    );
    assemble(schema, ticker, &snapshot, &lookup)
}
