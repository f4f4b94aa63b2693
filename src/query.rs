//! Query runner: executes a fixed set of named read-only queries against
//! the relational store and renders the results.
//!
//! Queries are static constants supplied by the caller, never built from
//! user text, so injection is avoided by construction.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::error;

use crate::error::{EtlError, Result};
use crate::table::{Column, ColumnType, DataTable, Value};

/// Outcome of one named query: a materialized table, or that query's
/// isolated failure.
#[derive(Debug)]
pub struct QueryOutcome {
    pub title: String,
    pub result: Result<DataTable>,
}

/// Run each `(title, sql)` pair in mapping order. A failing query surfaces
/// as a `Query` error in its own outcome and does not block the rest.
pub fn run_queries(db_path: &Path, queries: &[(String, String)]) -> Result<Vec<QueryOutcome>> {
    let conn = Connection::open(db_path)?;
    let mut outcomes = Vec::with_capacity(queries.len());
    for (title, sql) in queries {
        let result = run_one(&conn, sql).map_err(|e| EtlError::Query {
            title: title.clone(),
            message: e.to_string(),
        });
        if let Err(e) = &result {
            error!("{e}");
        }
        outcomes.push(QueryOutcome {
            title: title.clone(),
            result,
        });
    }
    Ok(outcomes)
}

fn run_one(conn: &Connection, sql: &str) -> rusqlite::Result<DataTable> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<Column> = stmt
        .column_names()
        .into_iter()
        .map(|name| Column::new(name, ColumnType::Text))
        .collect();
    let column_count = columns.len();

    let mut rows = Vec::new();
    let mut raw_rows = stmt.query([])?;
    while let Some(row) = raw_rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(match row.get_ref(i)? {
                ValueRef::Null => Value::Null,
                ValueRef::Integer(n) => Value::Integer(n),
                ValueRef::Real(x) => Value::Decimal(x),
                ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
                ValueRef::Blob(_) => Value::Null,
            });
        }
        rows.push(values);
    }
    Ok(DataTable { columns, rows })
}

/// Render a result table as left-aligned padded text for the terminal.
pub fn render_table(table: &DataTable) -> String {
    let rendered: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.name.len()).collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut out = String::new();
    let header = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<width$}", c.name, width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(header.trim_end());
    out.push('\n');
    for row in &rendered {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
