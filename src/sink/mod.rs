//! Sink writers: flat-file and relational persistence of the result table.

pub mod flat_file;
pub mod relational;

/// How the relational sink treats an existing target table. Caller-specified
/// per call, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Drop and recreate the table with exactly the incoming rows.
    Replace,
    /// Insert rows alongside existing ones; column sets must be compatible.
    Append,
}
