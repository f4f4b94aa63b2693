//! Film-ranking scrapes. Both variants read the same archived ranking page
//! and extract positionally, since the page's table has no stable header
//! names worth validating against.

use std::path::Path;

use crate::fetch::Source;
use crate::normalize::{NormalizeOptions, RangeFilter};
use crate::pipeline::{PipelineConfig, SourceFormat};
use crate::schema::{ColumnSpec, TableSchema};
use crate::sink::WriteMode;
use crate::table::ColumnType;

pub const URL: &str =
    "https://web.archive.org/web/20230902185655/https://en.everybodywiki.com/100_Most_Highly-Ranked_Films";
pub const TOP_TABLE: &str = "Top_50";
pub const FILTERED_TABLE: &str = "Top_25";

/// The 50 most highly ranked films of all time.
pub fn top_films_config(output_dir: &Path, log_dir: &Path, source: Option<Source>) -> PipelineConfig {
    let schema = TableSchema::new(vec![
        ColumnSpec::indexed(0, "Average Rank", ColumnType::Integer, true),
        ColumnSpec::indexed(1, "Film", ColumnType::Text, false),
        ColumnSpec::indexed(2, "Year", ColumnType::Integer, true),
    ]);

    PipelineConfig {
        name: "top-films".to_string(),
        source: source.unwrap_or_else(|| Source::Url(URL.to_string())),
        format: SourceFormat::Html {
            anchor: String::new(),
        },
        schema,
        normalize: NormalizeOptions {
            row_limit: Some(50),
            ..Default::default()
        },
        enrichment: None,
        csv_path: output_dir.join("top_films.csv"),
        db_path: output_dir.join("films.db"),
        table_name: TOP_TABLE.to_string(),
        write_mode: WriteMode::Replace,
        queries: vec![
            (
                "Sample rows".to_string(),
                format!("SELECT * FROM {TOP_TABLE} LIMIT 10;"),
            ),
            (
                "Row count".to_string(),
                format!("SELECT COUNT(*) AS n FROM {TOP_TABLE};"),
            ),
        ],
        progress_log: log_dir.join("films_etl.log"),
    }
}

/// The top films released between 2000 and 2009. The year filter runs
/// before the 25-row truncation, in document order.
pub fn films_2000s_config(
    output_dir: &Path,
    log_dir: &Path,
    source: Option<Source>,
) -> PipelineConfig {
    let schema = TableSchema::new(vec![
        ColumnSpec::indexed(1, "Film", ColumnType::Text, false),
        ColumnSpec::indexed(2, "Year", ColumnType::Integer, true),
        ColumnSpec::indexed(3, "Rotten Tomatoes' Top 100", ColumnType::Text, false),
    ]);

    PipelineConfig {
        name: "films-2000s".to_string(),
        source: source.unwrap_or_else(|| Source::Url(URL.to_string())),
        format: SourceFormat::Html {
            anchor: String::new(),
        },
        schema,
        normalize: NormalizeOptions {
            row_limit: Some(25),
            range_filter: Some(RangeFilter {
                column: "Year".to_string(),
                min: 2000.0,
                max: 2009.0,
            }),
            ..Default::default()
        },
        enrichment: None,
        csv_path: output_dir.join("films_2000s.csv"),
        db_path: output_dir.join("films_2000s.db"),
        table_name: FILTERED_TABLE.to_string(),
        write_mode: WriteMode::Replace,
        queries: vec![
            (
                "Sample rows".to_string(),
                format!("SELECT * FROM {FILTERED_TABLE} LIMIT 10;"),
            ),
            (
                "Row count".to_string(),
                format!("SELECT COUNT(*) AS n FROM {FILTERED_TABLE};"),
            ),
        ],
        progress_log: log_dir.join("films_etl.log"),
    }
}
