//! Largest-banks scrape: an archived Wikipedia table of bank market caps,
//! converted into every currency carried by the reference rate CSV.

use std::path::Path;

use crate::fetch::Source;
use crate::normalize::NormalizeOptions;
use crate::pipeline::{EnrichmentConfig, PipelineConfig, SourceFormat};
use crate::schema::{ColumnSpec, TableSchema};
use crate::sink::WriteMode;
use crate::table::ColumnType;

pub const URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";
pub const RATES_URL: &str =
    "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMSkillsNetwork-PY0221EN-Coursera/labs/v2/exchange_rate.csv";
pub const TABLE_NAME: &str = "largest_banks";

// The page carries many unrelated tables; this token pins the
// by-market-capitalization one.
const ANCHOR: &str = "Market cap";

pub fn schema() -> TableSchema {
    TableSchema::new(vec![
        ColumnSpec::named("Bank name", "Name", ColumnType::Text, true),
        ColumnSpec::named(
            "Market cap (US$ billion)",
            "MC_USD_Billion",
            ColumnType::Decimal,
            true,
        ),
    ])
}

pub fn config(
    output_dir: &Path,
    log_dir: &Path,
    source: Option<Source>,
    rates: Option<Source>,
) -> PipelineConfig {
    PipelineConfig {
        name: "largest-banks".to_string(),
        source: source.unwrap_or_else(|| Source::Url(URL.to_string())),
        format: SourceFormat::Html {
            anchor: ANCHOR.to_string(),
        },
        schema: schema(),
        normalize: NormalizeOptions::default(),
        enrichment: Some(EnrichmentConfig {
            rates_source: rates.unwrap_or_else(|| Source::Url(RATES_URL.to_string())),
            base_column: "MC_USD_Billion".to_string(),
            base_currency: "USD".to_string(),
        }),
        csv_path: output_dir.join("largest_banks_data.csv"),
        db_path: output_dir.join("banks.db"),
        table_name: TABLE_NAME.to_string(),
        write_mode: WriteMode::Replace,
        queries: vec![
            (
                "Top 5 banks (USD)".to_string(),
                format!("SELECT Name, MC_USD_Billion FROM {TABLE_NAME} LIMIT 5;"),
            ),
            (
                "Top 5 banks (EUR)".to_string(),
                format!("SELECT Name, MC_EUR_Billion FROM {TABLE_NAME} LIMIT 5;"),
            ),
        ],
        progress_log: log_dir.join("etl_process.log"),
    }
}
