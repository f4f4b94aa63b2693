//! Table locator: finds the table of interest inside a raw document and
//! yields a [`TableGrid`].
//!
//! HTML sources are untrusted and may carry many unrelated tables, so the
//! structured-markup variant locates by content anchor rather than by
//! position. Tabular text goes straight to a grid.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{EtlError, Result};
use crate::table::TableGrid;

/// Walk the document's `<table>` elements in order and grid the first one
/// whose text contains `anchor`. An empty anchor matches the first table.
///
/// A leading all-`<th>` row becomes the grid header; everything else is a
/// body row with whitespace-collapsed cell text.
pub fn locate_html_table(html: &str, anchor: &str) -> Result<TableGrid> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    for table in document.select(&table_sel) {
        if !anchor.is_empty() {
            let text: String = table.text().collect();
            if !text.contains(anchor) {
                continue;
            }
        }

        let mut header: Option<Vec<String>> = None;
        let mut rows: Vec<Vec<String>> = Vec::new();
        for tr in table.select(&row_sel) {
            let cells: Vec<String> = tr.select(&cell_sel).map(cell_text).collect();
            if cells.is_empty() {
                continue;
            }
            let leading_header = header.is_none()
                && rows.is_empty()
                && tr.select(&cell_sel).all(|c| c.value().name() == "th");
            if leading_header {
                header = Some(cells);
            } else {
                rows.push(cells);
            }
        }

        debug!(
            anchor,
            header = header.is_some(),
            rows = rows.len(),
            "located table"
        );
        return Ok(TableGrid { header, rows });
    }

    Err(EtlError::TableNotFound(anchor.to_string()))
}

/// Parse an already-tabular payload into a grid. `has_header` says whether
/// the first record is a header row.
pub fn parse_csv_grid(data: &str, has_header: bool) -> Result<TableGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }

    let mut grid = TableGrid::default();
    if has_header && !records.is_empty() {
        grid.header = Some(records.remove(0));
    }
    grid.rows = records;
    Ok(grid)
}

fn cell_text(cell: ElementRef) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
