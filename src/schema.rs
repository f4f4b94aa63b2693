//! Schema contract between a located grid and the typed pipeline.
//!
//! The ordered column mapping is an entity, not a runtime accident:
//! changing it changes the contract of every downstream stage.

use crate::error::{EtlError, Result};
use crate::table::{ColumnType, TableGrid};

/// Where a canonical column's raw value comes from in the source grid.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource {
    /// Looked up in the grid's header row by source column name.
    Named(String),
    /// Fixed cell position, for header-less or positional sources.
    Index(usize),
}

/// One canonical column: its source, pipeline-stable name, declared type
/// and whether a null there disqualifies the whole row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub source: ColumnSource,
    pub name: String,
    pub ty: ColumnType,
    pub required: bool,
}

impl ColumnSpec {
    pub fn named(source: &str, name: &str, ty: ColumnType, required: bool) -> Self {
        Self {
            source: ColumnSource::Named(source.to_string()),
            name: name.to_string(),
            ty,
            required,
        }
    }

    pub fn indexed(index: usize, name: &str, ty: ColumnType, required: bool) -> Self {
        Self {
            source: ColumnSource::Index(index),
            name: name.to_string(),
            ty,
            required,
        }
    }
}

/// Ordered source-to-canonical column mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Hard stop when any named source column is absent from the grid's
    /// header: downstream coercion assumes the columns exist.
    pub fn validate(&self, grid: &TableGrid) -> Result<()> {
        let header: &[String] = grid.header.as_deref().unwrap_or(&[]);
        let missing: Vec<String> = self
            .columns
            .iter()
            .filter_map(|spec| match &spec.source {
                ColumnSource::Named(source) if !header.iter().any(|h| h == source) => {
                    Some(source.clone())
                }
                _ => None,
            })
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EtlError::SchemaMismatch { missing })
        }
    }

    /// Resolve every column to a cell index in the grid's body rows.
    pub fn resolve_indices(&self, grid: &TableGrid) -> Result<Vec<usize>> {
        let header: &[String] = grid.header.as_deref().unwrap_or(&[]);
        self.columns
            .iter()
            .map(|spec| match &spec.source {
                ColumnSource::Named(source) => header
                    .iter()
                    .position(|h| h == source)
                    .ok_or_else(|| EtlError::SchemaMismatch {
                        missing: vec![source.clone()],
                    }),
                ColumnSource::Index(index) => Ok(*index),
            })
            .collect()
    }
}
