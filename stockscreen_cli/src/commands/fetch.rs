//! `stockscreen fetch`: collect one row per ticker and print or export the table.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use stockscreen_lib::edgar::client::DEFAULT_USER_AGENT;
use stockscreen_lib::{
    parse_tickers, Collector, CsvExport, EdgarClient, ProgressReporter, Row, SchemaPreset,
    ScreenerError, Summary, Ticker, YahooClient,
};

use crate::output::{
    format_summary, print_json, print_results_csv, print_results_markdown, print_results_table,
    JsonReport, OutputFormat,
};

#[derive(Args)]
pub struct FetchArgs {
    /// Ticker symbols (comma- or space-separated)
    pub tickers: Vec<String>,

    /// Read tickers from a file, one or more per line ("-" for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Schema preset: raw or extended
    #[arg(long, default_value = "raw")]
    pub schema: String,

    /// Number of tickers fetched at once
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Write raw_data_<timestamp>.csv into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Yahoo Finance request timeout in seconds
    #[arg(long, default_value = "10")]
    pub yahoo_timeout: u64,

    /// SEC EDGAR request timeout in seconds
    #[arg(long, default_value = "5")]
    pub sec_timeout: u64,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub async fn run(args: &FetchArgs, format: &OutputFormat) -> Result<()> {
    let input = collect_input(&args.tickers, args.file.as_deref())?;
    let tickers = parse_tickers(&input);
    if tickers.is_empty() {
        return Err(ScreenerError::NoTickers.into());
    }
    tracing::info!("Found {} ticker(s): {}", tickers.len(), tickers.joined());

    let preset: SchemaPreset = args.schema.parse()?;
    let yahoo = yahoo_client(Duration::from_secs(args.yahoo_timeout))?;
    let edgar = edgar_client(Duration::from_secs(args.sec_timeout))?;
    let collector = Collector::new(yahoo, edgar, preset.schema());

    let progress = BarProgress::new(args.quiet);
    let table = collector
        .collect_concurrent(&tickers, usize::from(args.concurrency), &progress)
        .await?;
    let summary = table.summary();

    match format {
        OutputFormat::Table => {
            print_results_table(&table);
            println!("{}", format_summary(&summary));
        }
        OutputFormat::Json => print_json(&JsonReport::new(&table)),
        OutputFormat::Csv => {
            print_results_csv(&table)?;
            eprintln!("{}", format_summary(&summary));
        }
        OutputFormat::Markdown => {
            print_results_markdown(&table);
            println!();
            println!("{}", format_summary(&summary));
        }
    }

    if let Some(dir) = &args.export {
        let export = table.export(&Local::now())?;
        let path = write_export(dir, &export)?;
        tracing::info!("Saved {}", path.display());
    }

    Ok(())
}

/// Positional tickers plus the contents of `--file`, newline-joined.
///
/// Whitespace separates symbols only within positional args, where the shell
/// may pass `"aapl msft"` as one word. File and stdin text is kept verbatim.
fn collect_input(tickers: &[String], file: Option<&Path>) -> Result<String> {
    let mut input = tickers
        .iter()
        .flat_map(|arg| arg.split_whitespace())
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(path) = file {
        let contents = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read tickers from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read tickers from {}", path.display()))?
        };
        input.push('\n');
        input.push_str(&contents);
    }
    Ok(input)
}

fn yahoo_client(timeout: Duration) -> Result<YahooClient> {
    let client = match std::env::var("STOCKSCREEN_YAHOO_BASE_URL").ok() {
        Some(url) => YahooClient::with_base_url(&url)?,
        None => YahooClient::new()?,
    };
    Ok(client.with_timeout(timeout)?)
}

fn edgar_client(timeout: Duration) -> Result<EdgarClient> {
    let user_agent = std::env::var("STOCKSCREEN_SEC_USER_AGENT")
        .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    let client = match std::env::var("STOCKSCREEN_SEC_BASE_URL").ok() {
        Some(url) => EdgarClient::with_base_url(&url, &user_agent)?,
        None => EdgarClient::new(&user_agent)?,
    };
    Ok(client.with_timeout(timeout)?)
}

fn write_export(dir: &Path, export: &CsvExport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(&export.file_name);
    std::fs::write(&path, &export.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Progress bar on stderr, one tick per finished ticker.
struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        pb.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { pb }
    }
}

impl ProgressReporter for BarProgress {
    fn started(&self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn ticker_started(&self, ticker: &Ticker, index: usize, total: usize) {
        self.pb
            .set_message(format!("Processing {} ({}/{})", ticker, index + 1, total));
    }

    fn ticker_finished(&self, row: &Row) {
        if !row.market_status.is_success() {
            self.pb.println(format!(
                "  Warning: {} market data: {}",
                row.ticker,
                row.market_status.label()
            ));
        }
        self.pb.inc(1);
    }

    fn finished(&self, summary: &Summary) {
        self.pb.finish_with_message(format!(
            "done: {} market ok, {} filings found",
            summary.market_success, summary.filings_found
        ));
    }
}
