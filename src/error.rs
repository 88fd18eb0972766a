//! Domain failures raised by the pipeline stages.
//!
//! Everything else (I/O, CSV syntax, SQLite) travels as a plain
//! [`anyhow::Error`] with context attached at the call site. These variants
//! exist so callers can tell the data problems apart with
//! [`anyhow::Error::downcast_ref`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EtlError {
    #[error("Column '{column}' not found in {path:?}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("Categories file {path:?} contains no data rows")]
    EmptyCategories { path: PathBuf },

    #[error("Category segment '{segment}' does not end with a digit (line {line})")]
    InvalidCategoryValue { segment: String, line: u64 },

    #[error("Line {line} has {found} category segment(s), expected {expected}")]
    InconsistentSegments {
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("Table '{table}' already exists")]
    TableExists { table: String },
}
