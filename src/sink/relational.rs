//! Relational sink: writes the result table into a named table inside a
//! single-file SQLite store, in replace or append mode.

use std::path::Path;

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use tracing::info;

use crate::error::{EtlError, Result};
use crate::sink::WriteMode;
use crate::table::{ColumnType, DataTable, Value};

pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Write `table` under `table_name`. Replace drops and recreates the
    /// table with the schema inferred from the column types; append inserts
    /// into the existing table after a column-compatibility check. All
    /// inserts run inside one transaction. Returns the rows written.
    pub fn write(&mut self, table_name: &str, table: &DataTable, mode: WriteMode) -> Result<usize> {
        let existing = self.existing_columns(table_name)?;
        if mode == WriteMode::Append && !existing.is_empty() {
            let missing: Vec<String> = table
                .columns
                .iter()
                .filter(|c| !existing.iter().any(|e| e == &c.name))
                .map(|c| c.name.clone())
                .collect();
            if !missing.is_empty() {
                return Err(EtlError::SchemaMismatch { missing });
            }
        }

        let tx = self.conn.transaction()?;
        let create_fresh = match mode {
            WriteMode::Replace => {
                tx.execute_batch(&format!(
                    "DROP TABLE IF EXISTS {}",
                    quote_ident(table_name)
                ))?;
                true
            }
            // Appending to a missing table behaves like a fresh create.
            WriteMode::Append => existing.is_empty(),
        };
        if create_fresh {
            tx.execute_batch(&create_table_sql(table_name, table))?;
        }

        let column_list = table
            .columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=table.columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table_name),
            column_list,
            placeholders
        );

        let mut written = 0;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for row in &table.rows {
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
                written += 1;
            }
        }
        tx.commit()?;

        info!(table = table_name, rows = written, ?mode, "relational load complete");
        Ok(written)
    }

    /// Column names of an existing table, empty when the table is absent.
    fn existing_columns(&self, table_name: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1)")?;
        let names = stmt
            .query_map(params![table_name], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

fn create_table_sql(table_name: &str, table: &DataTable) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), sql_type(c.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table_name), columns)
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Text => "TEXT",
        ColumnType::Integer => "INTEGER",
        ColumnType::Decimal => "REAL",
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Integer(n) => SqlValue::Integer(*n),
        Value::Decimal(x) => SqlValue::Real(*x),
        Value::Null => SqlValue::Null,
    }
}
