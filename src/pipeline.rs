//! Pipeline orchestration: wires the stages strictly left to right and
//! reports what happened.
//!
//! Each run is a fresh, total execution over an explicit config; no state
//! survives between invocations. The first fatal error aborts the run
//! before any subsequent sink write.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::enrich::{self, RateTable};
use crate::error::Result;
use crate::fetch::{Source, SourceReader};
use crate::locate;
use crate::normalize::{self, DroppedRow, NormalizeOptions};
use crate::progress::ProgressLog;
use crate::query::{self, QueryOutcome};
use crate::schema::TableSchema;
use crate::sink::relational::SqliteSink;
use crate::sink::{flat_file, WriteMode};
use crate::table::TableGrid;

/// Shape of a pipeline's raw source.
#[derive(Debug, Clone)]
pub enum SourceFormat {
    /// Structured markup; locate the first table matching the anchor text.
    Html { anchor: String },
    /// Already-tabular payload; no locating step.
    Csv { has_header: bool },
}

/// Reference-rate join settings for the enrichment stage.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub rates_source: Source,
    pub base_column: String,
    pub base_currency: String,
}

/// Everything one pipeline run needs, passed explicitly so runs are
/// reproducible and testable without ambient state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub name: String,
    pub source: Source,
    pub format: SourceFormat,
    pub schema: TableSchema,
    pub normalize: NormalizeOptions,
    pub enrichment: Option<EnrichmentConfig>,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    pub write_mode: WriteMode,
    pub queries: Vec<(String, String)>,
    pub progress_log: PathBuf,
}

/// Counts, audit trail and per-query outcomes from one complete run.
#[derive(Debug)]
pub struct PipelineReport {
    pub extracted_rows: usize,
    pub dropped: Vec<DroppedRow>,
    pub loaded_rows: usize,
    pub derived_columns: usize,
    pub queries: Vec<QueryOutcome>,
}

/// Execute the full extract-validate-transform-load sequence for `config`.
pub fn run(reader: &SourceReader, config: &PipelineConfig) -> Result<PipelineReport> {
    let progress = ProgressLog::new(&config.progress_log);
    progress.record("Process: start")?;
    info!(pipeline = %config.name, "pipeline start");

    // Extract
    let document = reader.read(&config.source)?;
    let grid = locate_grid(&document.body, &config.format)?;
    config.schema.validate(&grid)?;
    let extracted_rows = grid.rows.len();
    progress.record("Data extraction complete. Initiating Transformation process")?;

    // Transform
    let outcome = normalize::normalize(&config.schema, &grid, &config.normalize)?;
    let mut table = outcome.table;
    let mut derived_columns = 0;
    if let Some(enrichment) = &config.enrichment {
        let rates_doc = reader.read(&enrichment.rates_source)?;
        let rates_grid = locate::parse_csv_grid(&rates_doc.body, true)?;
        let rates = RateTable::from_grid(&rates_grid);
        derived_columns = enrich::enrich(
            &mut table,
            &rates,
            &enrichment.base_column,
            &enrichment.base_currency,
        )?;
    }
    progress.record("Data transformation complete. Initiating Loading process")?;

    // Load: flat file first, then the relational store.
    ensure_parent(&config.csv_path)?;
    flat_file::write_csv(&table, &config.csv_path)?;
    progress.record("Data saved to CSV file")?;

    ensure_parent(&config.db_path)?;
    let mut sink = SqliteSink::open(&config.db_path)?;
    let loaded_rows = sink.write(&config.table_name, &table, config.write_mode)?;
    drop(sink);
    progress.record("Load DB: done (connection closed)")?;

    // Verify
    progress.record("Queries: start")?;
    let queries = query::run_queries(&config.db_path, &config.queries)?;
    progress.record("Queries: done (connection closed)")?;

    progress.record("Process: complete")?;
    info!(
        pipeline = %config.name,
        extracted = extracted_rows,
        dropped = outcome.dropped.len(),
        loaded = loaded_rows,
        "pipeline complete"
    );

    Ok(PipelineReport {
        extracted_rows,
        dropped: outcome.dropped,
        loaded_rows,
        derived_columns,
        queries,
    })
}

fn locate_grid(body: &str, format: &SourceFormat) -> Result<TableGrid> {
    match format {
        SourceFormat::Html { anchor } => locate::locate_html_table(body, anchor),
        SourceFormat::Csv { has_header } => locate::parse_csv_grid(body, *has_header),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
