//! Enrichment stage: joins the normalized table against a currency rate
//! table to derive converted columns.

use tracing::{info, warn};

use crate::error::{EtlError, Result};
use crate::table::{Column, ColumnType, DataTable, TableGrid, Value};

/// One currency and its validated positive rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub currency: String,
    pub rate: f64,
}

/// Ordered currency-to-rate reference table. Loaded fresh per run, never
/// mutated; entries keep the order of the source CSV.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    entries: Vec<RateEntry>,
}

impl RateTable {
    /// Build from a two-column grid (currency code, rate). Entries with an
    /// unparseable or non-positive rate are skipped rather than aborting
    /// the run; duplicate codes keep their first occurrence.
    pub fn from_grid(grid: &TableGrid) -> Self {
        let mut entries: Vec<RateEntry> = Vec::new();
        for row in &grid.rows {
            let currency = row.first().map(|s| s.trim()).unwrap_or("");
            let raw_rate = row.get(1).map(|s| s.trim()).unwrap_or("");
            if currency.is_empty() {
                continue;
            }
            let rate = match raw_rate.parse::<f64>() {
                Ok(r) if r > 0.0 && r.is_finite() => r,
                _ => {
                    warn!(currency, rate = raw_rate, "skipping invalid exchange rate entry");
                    continue;
                }
            };
            if entries.iter().any(|e| e.currency == currency) {
                warn!(currency, "duplicate currency code, keeping first entry");
                continue;
            }
            entries.push(RateEntry {
                currency: currency.to_string(),
                rate,
            });
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append one derived decimal column per non-base currency, computed as
/// `round(base × rate, 2)`. The derived name substitutes the currency code
/// into the base column's name; insertion order follows the rate table.
/// Returns the number of columns added.
pub fn enrich(
    table: &mut DataTable,
    rates: &RateTable,
    base_column: &str,
    base_currency: &str,
) -> Result<usize> {
    let base_idx = table.column_index(base_column).ok_or_else(|| {
        EtlError::Config(format!("enrichment base column {base_column:?} not present"))
    })?;

    let mut added = 0;
    for entry in rates.entries() {
        if entry.currency.eq_ignore_ascii_case(base_currency) {
            continue;
        }
        let name = derived_column_name(base_column, base_currency, &entry.currency);
        table.columns.push(Column::new(&name, ColumnType::Decimal));
        for row in &mut table.rows {
            let derived = match row[base_idx].as_f64() {
                Some(base) => Value::Decimal(round2(base * entry.rate)),
                None => Value::Null,
            };
            row.push(derived);
        }
        added += 1;
    }

    info!(added, base_column, "enrichment complete");
    Ok(added)
}

fn derived_column_name(base_column: &str, base_currency: &str, currency: &str) -> String {
    base_column.replace(base_currency, &currency.to_uppercase())
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
