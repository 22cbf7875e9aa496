use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::coerce::format_number;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw CSV contents: header row plus string cells. Short rows are allowed.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A cleaned cell. Empty source fields and failed coercions are `Missing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Display form, `None` for missing cells.
    pub fn display(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Cleaned records. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    integer_columns: BTreeSet<String>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new(), integer_columns: BTreeSet::new() }
    }

    /// Flag a numeric column whose every source cell was a whole-number
    /// literal. Its sums print without a decimal part.
    pub fn mark_integer(&mut self, name: &str) {
        self.integer_columns.insert(name.to_string());
    }

    pub fn is_integer_column(&self, name: &str) -> bool {
        self.integer_columns.contains(name)
    }

    /// Append a row, padding with `Missing` or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, top to bottom. Empty when the column is absent.
    pub fn column_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Value> + 'a {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| idx.and_then(|i| row.get(i)))
    }

    /// Distinct non-missing display values in order of first appearance.
    pub fn unique_values(&self, name: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for value in self.column_values(name) {
            if let Some(s) = value.display() {
                if seen.insert(s.clone()) {
                    out.push(s);
                }
            }
        }
        out
    }

    pub fn distinct_count(&self, name: &str) -> usize {
        self.unique_values(name).len()
    }

    /// Sum of numeric cells; missing and non-numeric cells are skipped.
    pub fn sum(&self, name: &str) -> f64 {
        self.column_values(name).filter_map(Value::as_number).sum()
    }

    /// Mean of numeric cells, `None` when there are none.
    pub fn mean(&self, name: &str) -> Option<f64> {
        let (total, count) = self
            .column_values(name)
            .filter_map(Value::as_number)
            .fold((0.0, 0usize), |(t, c), v| (t + v, c + 1));
        if count == 0 {
            None
        } else {
            Some(total / count as f64)
        }
    }
}
