//! In-memory table passed between the pipeline stages.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;

use crate::{
    data::{Value, parse_typed_value},
    error::EtlError,
    io_utils,
    schema::{ColumnType, infer_column_types},
};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub headers: Vec<String>,
    pub types: Vec<ColumnType>,
    pub rows: Vec<Row>,
    /// CSV line each row started on; empty for frames not read from a file.
    pub lines: Vec<u64>,
}

impl Frame {
    pub fn new(headers: Vec<String>, types: Vec<ColumnType>, rows: Vec<Row>) -> Self {
        Self {
            headers,
            types,
            rows,
            lines: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Source line of a row, falling back to its position behind a single
    /// header line.
    pub fn line(&self, row_idx: usize) -> u64 {
        self.lines
            .get(row_idx)
            .copied()
            .unwrap_or(row_idx as u64 + 2)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Like [`Frame::column_index`] but fails with [`EtlError::MissingColumn`].
    pub fn require_column(&self, name: &str, path: &Path) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            EtlError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    /// Values of one column, in row order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(Option::as_ref))
    }

    /// Reads a whole CSV file, inferring a type for every column first.
    pub fn read_csv(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))?;

        let mut raw_rows = Vec::new();
        let mut lines = Vec::new();
        for record in reader.byte_records() {
            let record = record.with_context(|| format!("Reading records from {path:?}"))?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let decoded = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding line {line} in {path:?}"))?;
            raw_rows.push(decoded);
            lines.push(line);
        }

        let types = infer_column_types(headers.len(), &raw_rows);
        debug!(
            "Inferred column types for {:?}: {}",
            path,
            headers
                .iter()
                .zip(types.iter())
                .map(|(name, ty)| format!("{name}:{ty}"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let rows = raw_rows
            .iter()
            .zip(lines.iter())
            .map(|(raw, line)| {
                types
                    .iter()
                    .enumerate()
                    .map(|(idx, ty)| {
                        let value = raw.get(idx).map(|s| s.as_str()).unwrap_or("");
                        parse_typed_value(value, ty)
                    })
                    .collect::<Result<Row>>()
                    .with_context(|| format!("Parsing line {line} in {path:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            headers,
            types,
            rows,
            lines,
        })
    }
}
