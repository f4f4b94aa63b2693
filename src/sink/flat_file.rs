//! Flat-file sink: serializes the result table as UTF-8 comma-delimited
//! text, header row included, no row index column.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::table::{DataTable, Value};

/// Write `table` to `path`, overwriting any existing file (full replace).
pub fn write_csv(table: &DataTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = table.len(), "flat-file load complete");
    Ok(())
}

/// Nulls serialize as empty fields; everything else via `Display`.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
