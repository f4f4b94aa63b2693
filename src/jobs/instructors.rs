//! Instructor roster load: a local header-less CSV into the staff store,
//! plus the fixed row the CLI appends to demonstrate append mode.

use std::path::Path;

use crate::fetch::Source;
use crate::normalize::NormalizeOptions;
use crate::pipeline::{PipelineConfig, SourceFormat};
use crate::schema::{ColumnSpec, TableSchema};
use crate::sink::WriteMode;
use crate::table::{Column, ColumnType, DataTable, Value};

pub const TABLE_NAME: &str = "INSTRUCTOR";

pub fn schema() -> TableSchema {
    TableSchema::new(vec![
        ColumnSpec::indexed(0, "ID", ColumnType::Integer, true),
        ColumnSpec::indexed(1, "FNAME", ColumnType::Text, false),
        ColumnSpec::indexed(2, "LNAME", ColumnType::Text, false),
        ColumnSpec::indexed(3, "CITY", ColumnType::Text, false),
        ColumnSpec::indexed(4, "CCODE", ColumnType::Text, false),
    ])
}

pub fn config(output_dir: &Path, log_dir: &Path, csv: &Path) -> PipelineConfig {
    PipelineConfig {
        name: "instructors".to_string(),
        source: Source::File(csv.to_path_buf()),
        format: SourceFormat::Csv { has_header: false },
        schema: schema(),
        normalize: NormalizeOptions::default(),
        enrichment: None,
        csv_path: output_dir.join("instructor_data.csv"),
        db_path: output_dir.join("STAFF.db"),
        table_name: TABLE_NAME.to_string(),
        write_mode: WriteMode::Replace,
        queries: vec![
            (
                "All rows".to_string(),
                format!("SELECT * FROM {TABLE_NAME};"),
            ),
            (
                "First names".to_string(),
                format!("SELECT FNAME FROM {TABLE_NAME};"),
            ),
            (
                "Row count".to_string(),
                format!("SELECT COUNT(*) AS n FROM {TABLE_NAME};"),
            ),
        ],
        progress_log: log_dir.join("staff_etl.log"),
    }
}

/// The one-row table the CLI appends after the initial load.
pub fn appended_row() -> DataTable {
    DataTable {
        columns: vec![
            Column::new("ID", ColumnType::Integer),
            Column::new("FNAME", ColumnType::Text),
            Column::new("LNAME", ColumnType::Text),
            Column::new("CITY", ColumnType::Text),
            Column::new("CCODE", ColumnType::Text),
        ],
        rows: vec![vec![
            Value::Integer(100),
            Value::Text("John".to_string()),
            Value::Text("Doe".to_string()),
            Value::Text("Paris".to_string()),
            Value::Text("FR".to_string()),
        ]],
    }
}
