//! Extract-validate-transform-load pipeline for small tabular datasets.
//!
//! Sources (archived HTML pages, remote or local CSVs) flow strictly left
//! to right through pure stages — fetch, locate, validate, normalize,
//! enrich — and land in a flat CSV file and a SQLite store, optionally
//! followed by verification queries.

pub mod config;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod jobs;
pub mod locate;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod schema;
pub mod sink;
pub mod table;

pub use error::{EtlError, Result};
