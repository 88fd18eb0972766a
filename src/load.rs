//! Loader stage: read both datasets, reshape the encoded categories and
//! left-join them onto the messages.
//!
//! The categories file carries one `categories` cell per row packing N
//! `name-value` segments separated by `;`. The category schema (names and
//! order) comes from the first row alone; later rows are only checked for
//! their segment count, never for their names.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    data::Value,
    error::EtlError,
    frame::{Frame, Row},
    io_utils,
    schema::ColumnType,
};

pub const ID_COLUMN: &str = "id";
pub const CATEGORIES_COLUMN: &str = "categories";

const SEGMENT_SEPARATOR: char = ';';
const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// How the two input files are read.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Category names and per-id integer values parsed from the categories file.
struct Categories {
    names: Vec<String>,
    by_id: HashMap<Value, Vec<Vec<i64>>>,
}

pub fn load_data(messages_path: &Path, categories_path: &Path, options: &ReadOptions) -> Result<Frame> {
    let messages = read_input(messages_path, options)?;
    messages.require_column(ID_COLUMN, messages_path)?;
    info!(
        "Read {} message row(s) across {} column(s) from {:?}",
        messages.len(),
        messages.headers.len(),
        messages_path
    );

    let raw_categories = read_input(categories_path, options)?;
    let categories = reshape_categories(&raw_categories, categories_path)?;
    info!(
        "Read {} category row(s) encoding {} categor(y/ies) from {:?}",
        raw_categories.len(),
        categories.names.len(),
        categories_path
    );

    let joined = left_join(&messages, &categories)?;
    info!(
        "Joined frame has {} row(s) and {} column(s)",
        joined.len(),
        joined.headers.len()
    );
    Ok(joined)
}

fn read_input(path: &Path, options: &ReadOptions) -> Result<Frame> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    Frame::read_csv(path, delimiter, options.encoding)
        .with_context(|| format!("Loading {path:?}"))
}

/// Splits every encoded `categories` cell into named integer columns keyed by id.
fn reshape_categories(frame: &Frame, path: &Path) -> Result<Categories> {
    let id_idx = frame.require_column(ID_COLUMN, path)?;
    let categories_idx = frame.require_column(CATEGORIES_COLUMN, path)?;

    let encoded: Vec<String> = frame
        .column(categories_idx)
        .map(|cell| cell.map(Value::as_display).unwrap_or_default())
        .collect();
    let split: Vec<Vec<&str>> = encoded
        .iter()
        .map(|cell| cell.split(SEGMENT_SEPARATOR).collect())
        .collect();

    let Some(first) = split.first() else {
        return Err(EtlError::EmptyCategories {
            path: path.to_path_buf(),
        }
        .into());
    };
    let expected = split.iter().map(Vec::len).max().unwrap_or_default();
    let names = category_names(first);
    debug!("Category schema from first row: {:?}", names);

    let mut by_id: HashMap<Value, Vec<Vec<i64>>> = HashMap::new();
    for (row_idx, (segments, id)) in split.iter().zip(frame.column(id_idx)).enumerate() {
        let line = frame.line(row_idx);
        if segments.len() != expected {
            return Err(EtlError::InconsistentSegments {
                line,
                found: segments.len(),
                expected,
            }
            .into());
        }
        let values = segments
            .iter()
            .map(|segment| category_value(segment, line))
            .collect::<Result<Vec<_>>>()?;
        if let Some(id) = id {
            by_id.entry(join_key(id)).or_default().push(values);
        }
    }

    Ok(Categories { names, by_id })
}

/// Category names are the segments with their `-<digit>` suffix removed.
pub fn category_names(segments: &[&str]) -> Vec<String> {
    segments
        .iter()
        .map(|segment| {
            let keep = segment.chars().count().saturating_sub(2);
            segment.chars().take(keep).collect()
        })
        .collect()
}

/// The value of a segment is its final character read as a digit; it is not
/// clamped to {0, 1}.
pub fn category_value(segment: &str, line: u64) -> Result<i64> {
    segment
        .chars()
        .last()
        .and_then(|ch| ch.to_digit(10))
        .map(i64::from)
        .ok_or_else(|| {
            EtlError::InvalidCategoryValue {
                segment: segment.to_string(),
                line,
            }
            .into()
        })
}

/// Keeps every message row; each matching category record yields one output
/// row and unmatched messages get missing category cells.
fn left_join(messages: &Frame, categories: &Categories) -> Result<Frame> {
    let id_idx = messages
        .column_index(ID_COLUMN)
        .with_context(|| format!("Messages frame has no '{ID_COLUMN}' column"))?;

    let (headers, types) = build_output_headers(messages, &categories.names);
    let width = categories.names.len();

    let mut rows: Vec<Row> = Vec::with_capacity(messages.len());
    let mut unmatched = 0usize;
    for message in &messages.rows {
        let matches = message
            .get(id_idx)
            .and_then(Option::as_ref)
            .and_then(|id| categories.by_id.get(&join_key(id)));
        match matches {
            Some(bucket) => {
                for values in bucket {
                    let mut combined = message.clone();
                    combined.extend(values.iter().map(|v| Some(Value::Integer(*v))));
                    rows.push(combined);
                }
            }
            None => {
                unmatched += 1;
                let mut combined = message.clone();
                combined.extend(std::iter::repeat_n(None, width));
                rows.push(combined);
            }
        }
    }
    if unmatched > 0 {
        info!("{unmatched} message row(s) had no matching categories");
    }

    Ok(Frame::new(headers, types, rows))
}

/// Whole-number floats key like integers so `1` and `1.0` ids match even when
/// the two files infer different types for `id`.
pub fn join_key(value: &Value) -> Value {
    match value {
        Value::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Value::Integer(*f as i64)
        }
        other => other.clone(),
    }
}

fn build_output_headers(messages: &Frame, category_names: &[String]) -> (Vec<String>, Vec<ColumnType>) {
    let left: HashSet<&str> = messages.headers.iter().map(String::as_str).collect();
    let right: HashSet<&str> = category_names.iter().map(String::as_str).collect();

    let mut headers: Vec<String> = messages
        .headers
        .iter()
        .map(|name| {
            if name != ID_COLUMN && right.contains(name.as_str()) {
                format!("{name}{LEFT_SUFFIX}")
            } else {
                name.clone()
            }
        })
        .collect();
    headers.extend(category_names.iter().map(|name| {
        if left.contains(name.as_str()) {
            format!("{name}{RIGHT_SUFFIX}")
        } else {
            name.clone()
        }
    }));

    let mut types = messages.types.clone();
    types.extend(std::iter::repeat_n(ColumnType::Integer, category_names.len()));
    (headers, types)
}
