//! Column type inference.
//!
//! Every input column is scanned in full and assigned the narrowest
//! [`ColumnType`] that accepts all of its non-empty cells. The type decides
//! both how cells are parsed into [`crate::data::Value`]s and which declared
//! type the column receives in SQLite.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    String,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::String => "TEXT",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default)]
struct TypeCandidate {
    non_empty: usize,
    integer_matches: usize,
    float_matches: usize,
}

impl TypeCandidate {
    fn update(&mut self, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.non_empty += 1;
        if trimmed.parse::<i64>().is_ok() {
            self.integer_matches += 1;
            self.float_matches += 1;
        } else if trimmed.parse::<f64>().is_ok() {
            self.float_matches += 1;
        }
    }

    fn decide(&self) -> ColumnType {
        if self.non_empty == 0 {
            ColumnType::String
        } else if self.integer_matches == self.non_empty {
            ColumnType::Integer
        } else if self.float_matches == self.non_empty {
            ColumnType::Float
        } else {
            ColumnType::String
        }
    }
}

/// Infers one type per column from raw string rows.
///
/// Rows shorter than `column_count` simply contribute nothing for the
/// missing positions.
pub fn infer_column_types(column_count: usize, rows: &[Vec<String>]) -> Vec<ColumnType> {
    let mut candidates = vec![TypeCandidate::default(); column_count];
    for row in rows {
        for (candidate, value) in candidates.iter_mut().zip(row.iter()) {
            candidate.update(value);
        }
    }
    candidates.iter().map(TypeCandidate::decide).collect()
}
