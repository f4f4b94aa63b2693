//! Row normalizer: cleans raw cells, coerces them to typed values and
//! decides row disposition.
//!
//! Disposition order is fixed: the range predicate runs first, truncation
//! at the row limit counts only rows that passed it, and the required-null
//! check runs last on the truncated set. Surviving rows keep document
//! order (stable filter, no reordering).

use tracing::{debug, warn};

use crate::error::{EtlError, Result};
use crate::schema::TableSchema;
use crate::table::{Column, ColumnType, DataTable, TableGrid, Value};

/// The usual markers sources use for "missing".
pub fn default_sentinels() -> Vec<String> {
    ["N/A", "n/a", "NA", "", "null", "None"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Knobs for one normalization pass.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Strings treated as equivalent to null after trimming.
    pub sentinels: Vec<String>,
    /// Stop consuming rows once this many have been accepted, in document
    /// order; surplus locator output is simply not consumed.
    pub row_limit: Option<usize>,
    /// Keep only rows whose named column falls inside the closed interval.
    pub range_filter: Option<RangeFilter>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            sentinels: default_sentinels(),
            row_limit: None,
            range_filter: None,
        }
    }
}

/// Numeric-range predicate over one canonical column.
#[derive(Debug, Clone)]
pub struct RangeFilter {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// These required columns were null after cleaning.
    MissingRequired(Vec<String>),
    /// The range-filter column was null or outside the accepted interval.
    OutOfRange(String),
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::MissingRequired(cols) => write!(f, "missing required {cols:?}"),
            DropReason::OutOfRange(col) => write!(f, "{col} out of accepted range"),
        }
    }
}

/// A row removed during disposition, kept fully enumerable for diagnostics
/// before discard.
#[derive(Debug, Clone)]
pub struct DroppedRow {
    /// Index of the row in the locator's grid (document order).
    pub grid_index: usize,
    pub values: Vec<Value>,
    pub reason: DropReason,
}

/// Surviving table plus the audit trail of what was removed.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub table: DataTable,
    pub dropped: Vec<DroppedRow>,
}

/// Clean, coerce and filter the grid into a typed table.
pub fn normalize(
    schema: &TableSchema,
    grid: &TableGrid,
    opts: &NormalizeOptions,
) -> Result<NormalizeOutcome> {
    schema.validate(grid)?;
    let indices = schema.resolve_indices(grid)?;
    let width_needed = indices.iter().copied().max().map_or(0, |i| i + 1);

    let filter_pos = match &opts.range_filter {
        Some(filter) => Some(
            schema
                .columns
                .iter()
                .position(|c| c.name == filter.column)
                .ok_or_else(|| {
                    EtlError::Config(format!(
                        "range filter references unknown column {:?}",
                        filter.column
                    ))
                })?,
        ),
        None => None,
    };

    let mut accepted: Vec<(usize, Vec<Value>)> = Vec::new();
    let mut dropped: Vec<DroppedRow> = Vec::new();

    for (grid_index, raw_row) in grid.rows.iter().enumerate() {
        if let Some(limit) = opts.row_limit {
            if accepted.len() == limit {
                break;
            }
        }
        // Separator and junk rows are narrower than the schema needs;
        // they are skipped, not dropped.
        if raw_row.len() < width_needed {
            debug!(grid_index, width = raw_row.len(), "skipping narrow row");
            continue;
        }

        let values: Vec<Value> = schema
            .columns
            .iter()
            .zip(&indices)
            .map(|(spec, &idx)| clean_cell(&raw_row[idx], spec.ty, &opts.sentinels))
            .collect();

        if let (Some(pos), Some(filter)) = (filter_pos, &opts.range_filter) {
            let in_range = values[pos]
                .as_f64()
                .is_some_and(|x| x >= filter.min && x <= filter.max);
            if !in_range {
                dropped.push(DroppedRow {
                    grid_index,
                    values,
                    reason: DropReason::OutOfRange(filter.column.clone()),
                });
                continue;
            }
        }

        accepted.push((grid_index, values));
    }

    let columns: Vec<Column> = schema
        .columns
        .iter()
        .map(|spec| Column::new(&spec.name, spec.ty))
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(accepted.len());
    for (grid_index, values) in accepted {
        let null_required: Vec<String> = schema
            .columns
            .iter()
            .zip(&values)
            .filter(|(spec, value)| spec.required && value.is_null())
            .map(|(spec, _)| spec.name.clone())
            .collect();

        if null_required.is_empty() {
            rows.push(values);
        } else {
            dropped.push(DroppedRow {
                grid_index,
                values,
                reason: DropReason::MissingRequired(null_required),
            });
        }
    }

    dropped.sort_by_key(|d| d.grid_index);
    if !dropped.is_empty() {
        warn!(
            dropped = dropped.len(),
            kept = rows.len(),
            "dropping invalid rows"
        );
        for row in &dropped {
            warn!(grid_index = row.grid_index, reason = %row.reason, values = ?row.values, "dropped row");
        }
    }

    Ok(NormalizeOutcome {
        table: DataTable { columns, rows },
        dropped,
    })
}

/// Per-cell cleaning and typed coercion.
///
/// Text: trim, then sentinel-to-null. Numeric: trim, strip embedded
/// newlines and grouping commas, parse; unparseable text becomes null so
/// the filtering step can decide disposition.
fn clean_cell(raw: &str, ty: ColumnType, sentinels: &[String]) -> Value {
    let trimmed = raw.trim();
    match ty {
        ColumnType::Text => {
            if sentinels.iter().any(|s| s == trimmed) {
                Value::Null
            } else {
                Value::Text(trimmed.to_string())
            }
        }
        ColumnType::Integer => match scrub_numeric(trimmed).parse::<i64>() {
            Ok(n) => Value::Integer(n),
            Err(_) => {
                coercion_warning(trimmed, sentinels);
                Value::Null
            }
        },
        ColumnType::Decimal => match scrub_numeric(trimmed).parse::<f64>() {
            Ok(x) => Value::Decimal(x),
            Err(_) => {
                coercion_warning(trimmed, sentinels);
                Value::Null
            }
        },
    }
}

fn coercion_warning(raw: &str, sentinels: &[String]) {
    if !raw.is_empty() && !sentinels.iter().any(|s| s == raw) {
        warn!(value = raw, "numeric coercion failed, treating as null");
    }
}

fn scrub_numeric(s: &str) -> String {
    s.chars()
        .filter(|c| *c != ',' && *c != '\n' && *c != '\r')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnSpec;

    fn bank_schema() -> TableSchema {
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

    fn bank_grid(rows: Vec<Vec<&str>>) -> TableGrid {
        TableGrid {
            header: Some(vec![
                "Bank name".to_string(),
                "Market cap (US$ billion)".to_string(),
            ]),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn test_sentinel_becomes_null_and_row_is_dropped() {
        let grid = bank_grid(vec![
            vec!["Acme Bank", "100"],
            vec!["N/A", "50"],
            vec!["Beta Bank", "not-a-number"],
        ]);
        let outcome = normalize(&bank_schema(), &grid, &NormalizeOptions::default()).unwrap();

        assert_eq!(outcome.table.len(), 1);
        assert_eq!(
            outcome.table.rows[0],
            vec![Value::Text("Acme Bank".into()), Value::Decimal(100.0)]
        );
        assert_eq!(outcome.dropped.len(), 2);
        assert_eq!(
            outcome.dropped[0].reason,
            DropReason::MissingRequired(vec!["Name".into()])
        );
        assert_eq!(
            outcome.dropped[1].reason,
            DropReason::MissingRequired(vec!["MC_USD_Billion".into()])
        );
    }

    #[test]
    fn test_grouping_separators_and_newlines_are_scrubbed() {
        let grid = bank_grid(vec![vec!["  Acme Bank  ", "1,234\n.5"]]);
        let outcome = normalize(&bank_schema(), &grid, &NormalizeOptions::default()).unwrap();
        assert_eq!(
            outcome.table.rows[0],
            vec![Value::Text("Acme Bank".into()), Value::Decimal(1234.5)]
        );
    }

    #[test]
    fn test_normalize_is_idempotent_on_clean_input() {
        let grid = bank_grid(vec![
            vec!["Acme Bank", "100"],
            vec!["Beta Bank", "95.37"],
        ]);
        let opts = NormalizeOptions::default();
        let first = normalize(&bank_schema(), &grid, &opts).unwrap();

        // Re-feed the normalized output as a fresh grid of rendered cells.
        let regrid = TableGrid {
            header: Some(vec![
                "Bank name".to_string(),
                "Market cap (US$ billion)".to_string(),
            ]),
            rows: first
                .table
                .rows
                .iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        };
        let second = normalize(&bank_schema(), &regrid, &opts).unwrap();
        assert_eq!(second.table, first.table);
        assert!(second.dropped.is_empty());
    }

    fn film_schema() -> TableSchema {
        TableSchema::new(vec![
            ColumnSpec::indexed(0, "Film", ColumnType::Text, false),
            ColumnSpec::indexed(1, "Year", ColumnType::Integer, true),
        ])
    }

    fn film_grid(rows: Vec<Vec<&str>>) -> TableGrid {
        TableGrid {
            header: None,
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn test_range_filter_runs_before_truncation() {
        let grid = film_grid(vec![
            vec!["Old Film", "1999"],
            vec!["First Keeper", "2001"],
            vec!["Second Keeper", "2002"],
            vec!["Third Qualifier", "2003"],
        ]);
        let opts = NormalizeOptions {
            row_limit: Some(2),
            range_filter: Some(RangeFilter {
                column: "Year".into(),
                min: 2000.0,
                max: 2009.0,
            }),
            ..Default::default()
        };
        let outcome = normalize(&film_schema(), &grid, &opts).unwrap();

        // 1999 is filtered, then the limit keeps the first two qualifiers
        // in document order; the third is never consumed.
        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.table.rows[0][0], Value::Text("First Keeper".into()));
        assert_eq!(outcome.table.rows[1][0], Value::Text("Second Keeper".into()));
        assert_eq!(outcome.dropped.len(), 1);
        assert_eq!(
            outcome.dropped[0].reason,
            DropReason::OutOfRange("Year".into())
        );
    }

    #[test]
    fn test_unparseable_range_column_counts_as_out_of_range() {
        let grid = film_grid(vec![vec!["Mystery Film", "unknown"], vec!["Keeper", "2005"]]);
        let opts = NormalizeOptions {
            range_filter: Some(RangeFilter {
                column: "Year".into(),
                min: 2000.0,
                max: 2009.0,
            }),
            ..Default::default()
        };
        let outcome = normalize(&film_schema(), &grid, &opts).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.dropped.len(), 1);
    }

    #[test]
    fn test_narrow_rows_are_skipped_not_dropped() {
        let grid = film_grid(vec![vec!["separator"], vec!["Keeper", "2005"]]);
        let outcome = normalize(&film_schema(), &grid, &NormalizeOptions::default()).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert!(outcome.dropped.is_empty());
    }

    #[test]
    fn test_dropped_count_matches_absent_rows() {
        let grid = bank_grid(vec![
            vec!["Acme Bank", "100"],
            vec!["", "50"],
            vec!["Beta Bank", "90"],
            vec!["null", "80"],
        ]);
        let outcome = normalize(&bank_schema(), &grid, &NormalizeOptions::default()).unwrap();
        assert_eq!(
            grid.rows.len() - outcome.table.len(),
            outcome.dropped.len()
        );
    }
}
