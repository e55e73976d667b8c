use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use stockscreen_lib::{Cell, FieldSchema, ResultTable, Summary, METRIC_DEFINITIONS};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
pub struct ColumnRow {
    #[tabled(rename = "#")]
    #[serde(rename = "#")]
    position: usize,
    #[tabled(rename = "Column")]
    #[serde(rename = "Column")]
    name: String,
    #[tabled(rename = "Source")]
    #[serde(rename = "Source")]
    source: String,
}

pub fn build_column_rows(schema: &FieldSchema) -> Vec<ColumnRow> {
    schema
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| ColumnRow {
            position: i + 1,
            name: c.name.to_string(),
            source: c.source.to_string(),
        })
        .collect()
}

/// Dynamic-width table: header from the schema, one record per row.
fn build_results_table(table: &ResultTable) -> Table {
    let mut builder = Builder::default();
    builder.push_record(table.columns().into_iter().map(String::from));
    for row in table.rows() {
        builder.push_record(row.to_strings());
    }
    builder.build()
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "Total tickers: {} | Yahoo success: {} | SEC filings found: {}",
        summary.total_tickers, summary.market_success, summary.filings_found
    )
}

/// Footnote listing the reference metric formulas, one per line.
pub fn format_definitions() -> String {
    let mut out = String::from("Definitions:");
    for (name, formula) in METRIC_DEFINITIONS {
        out.push_str(&format!("\n  {}: {}", name, formula));
    }
    out
}

// -- Table output --

pub fn print_results_table(table: &ResultTable) {
    println!("{}", build_results_table(table));
}

pub fn print_columns_table(schema: &FieldSchema) {
    println!("{}", Table::new(build_column_rows(schema)));
}

// -- Markdown output --

pub fn print_results_markdown(table: &ResultTable) {
    let mut rendered = build_results_table(table);
    rendered.with(Style::markdown());
    println!("{}", rendered);
}

pub fn print_columns_markdown(schema: &FieldSchema) {
    let mut table = Table::new(build_column_rows(schema));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_results_csv(table: &ResultTable) -> Result<()> {
    print!("{}", table.to_csv()?);
    Ok(())
}

pub fn print_columns_csv(schema: &FieldSchema) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_column_rows(schema) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

/// JSON document for a finished run: counts, column order and one object per row.
#[derive(Serialize)]
pub struct JsonReport {
    summary: Summary,
    columns: Vec<&'static str>,
    rows: Vec<Map<String, Value>>,
}

impl JsonReport {
    pub fn new(table: &ResultTable) -> Self {
        Self {
            summary: table.summary(),
            columns: table.columns(),
            rows: build_json_records(table),
        }
    }
}

fn build_json_records(table: &ResultTable) -> Vec<Map<String, Value>> {
    let columns = table.columns();
    table
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .zip(&row.cells)
                .map(|(name, cell)| (name.to_string(), cell_to_json(cell)))
                .collect()
        })
        .collect()
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Integer(v) => Value::from(*v),
        Cell::Number(v) => Value::from(*v),
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Bool(b) => Value::Bool(*b),
    }
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
