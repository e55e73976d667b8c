use anyhow::Result;
use clap::Args;
use stockscreen_lib::SchemaPreset;

use crate::output::{
    build_column_rows, format_definitions, print_columns_csv, print_columns_markdown,
    print_columns_table, print_json, OutputFormat,
};

#[derive(Args)]
pub struct ColumnsArgs {
    /// Schema preset: raw or extended
    #[arg(long, default_value = "raw")]
    pub schema: String,
}

pub fn run(args: &ColumnsArgs, format: &OutputFormat) -> Result<()> {
    let preset: SchemaPreset = args.schema.parse()?;
    let schema = preset.schema();

    match format {
        OutputFormat::Table => {
            print_columns_table(&schema);
            println!("{}", format_definitions());
        }
        OutputFormat::Json => print_json(&build_column_rows(&schema)),
        OutputFormat::Csv => print_columns_csv(&schema)?,
        OutputFormat::Markdown => {
            print_columns_markdown(&schema);
            println!();
            println!("{}", format_definitions());
        }
    }
    Ok(())
}
