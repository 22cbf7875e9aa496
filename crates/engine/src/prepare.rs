//! Raw CSV cells -> cleaned `RecordTable`.
//!
//! Rename known headers, coerce the numeric columns, parse the effective
//! date and derive the month columns. Nothing here fails: bad cells become
//! `Value::Missing` and are tallied in a `CoercionReport`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::coerce::{coerce_number, is_integer_literal, month_bucket, month_display, parse_day_first};
use crate::columns::{self, EFFECTIVE_DATE, YEAR_MONTH, YEAR_MONTH_DISPLAY};
use crate::table::{RawTable, RecordTable, Value};

/// Per-column count of non-empty source values that failed coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionReport {
    pub failures: BTreeMap<String, usize>,
}

impl CoercionReport {
    pub fn total(&self) -> usize {
        self.failures.values().sum()
    }

    pub fn for_column(&self, column: &str) -> usize {
        self.failures.get(column).copied().unwrap_or(0)
    }

    fn record(&mut self, column: &str) {
        *self.failures.entry(column.to_string()).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone)]
pub struct Prepared {
    pub table: RecordTable,
    pub report: CoercionReport,
}

enum ColumnKind {
    Text,
    Numeric,
    Date,
}

pub fn prepare(raw: RawTable) -> Prepared {
    let mut headers: Vec<String> = raw
        .headers
        .iter()
        .map(|h| columns::translate(h).to_string())
        .collect();

    let kinds: Vec<ColumnKind> = headers
        .iter()
        .map(|h| {
            if columns::is_numeric(h) {
                ColumnKind::Numeric
            } else if h == EFFECTIVE_DATE {
                ColumnKind::Date
            } else {
                ColumnKind::Text
            }
        })
        .collect();

    let date_idx = headers.iter().position(|h| h == EFFECTIVE_DATE);
    if date_idx.is_some() {
        headers.push(YEAR_MONTH.to_string());
        headers.push(YEAR_MONTH_DISPLAY.to_string());
    }

    let mut report = CoercionReport::default();
    let mut table = RecordTable::new(headers.clone());
    // Numeric columns stay integral until a missing or fractional cell shows up
    let mut integral: Vec<bool> = kinds.iter().map(|k| matches!(k, ColumnKind::Numeric)).collect();
    let row_count = raw.rows.len();

    for raw_row in raw.rows {
        let mut row: Vec<Value> = Vec::with_capacity(headers.len());

        for (idx, kind) in kinds.iter().enumerate() {
            let cell = raw_row.get(idx).map(String::as_str).unwrap_or("");
            let value = match kind {
                ColumnKind::Text if cell.is_empty() => Value::Missing,
                ColumnKind::Text => Value::Text(cell.to_string()),
                ColumnKind::Numeric => match coerce_number(cell) {
                    Some(n) if !is_integer_literal(cell) => {
                        integral[idx] = false;
                        Value::Number(n)
                    }
                    Some(n) => Value::Number(n),
                    None => {
                        integral[idx] = false;
                        if !cell.trim().is_empty() {
                            report.record(&headers[idx]);
                        }
                        Value::Missing
                    }
                },
                ColumnKind::Date => match parse_day_first(cell) {
                    Some(d) => Value::Date(d),
                    None => {
                        if !cell.trim().is_empty() {
                            report.record(&headers[idx]);
                        }
                        Value::Missing
                    }
                },
            };
            row.push(value);
        }

        if let Some(di) = date_idx {
            match row[di].as_date() {
                Some(d) => {
                    row.push(Value::Text(month_bucket(d)));
                    row.push(Value::Text(month_display(d)));
                }
                None => {
                    row.push(Value::Missing);
                    row.push(Value::Missing);
                }
            }
        }

        table.push_row(row);
    }

    if row_count > 0 {
        for (idx, whole) in integral.iter().enumerate() {
            if *whole {
                table.mark_integer(&headers[idx]);
            }
        }
    }

    for (column, count) in &report.failures {
        log::debug!("{count} value(s) in '{column}' could not be coerced");
    }

    Prepared { table, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn renames_known_headers_and_keeps_others() {
        let p = prepare(raw(&["Customer", "Coverage", "Loyalty"], &[&["BU79786", "Basic", "gold"]]));
        assert_eq!(p.table.columns(), &["Cliente", "Cobertura", "Loyalty"]);
    }

    #[test]
    fn numeric_columns_hold_numbers_or_missing() {
        let p = prepare(raw(
            &["Customer Lifetime Value", "Income", "Number of Policies"],
            &[
                &["1.234,56", "$56,274", "1"],
                &["n/a", "", "two"],
            ],
        ));
        let rows = p.table.rows();
        assert_eq!(rows[0][0], Value::Number(123456.0));
        assert_eq!(rows[0][1], Value::Number(56274.0));
        assert_eq!(rows[0][2], Value::Number(1.0));
        assert!(rows[1].iter().all(Value::is_missing));

        for row in rows {
            for cell in row {
                assert!(matches!(cell, Value::Number(n) if n.is_finite()) || cell.is_missing());
            }
        }
    }

    #[test]
    fn failures_are_counted_but_empty_cells_are_not() {
        let p = prepare(raw(
            &["Income", "Effective To Date"],
            &[&["abc", "bad"], &["", ""], &["x", "31/01/2023"]],
        ));
        assert_eq!(p.report.for_column("Ingreso"), 2);
        assert_eq!(p.report.for_column("Fecha Efectiva"), 1);
        assert_eq!(p.report.total(), 3);
    }

    #[test]
    fn date_column_derives_month_columns() {
        let p = prepare(raw(&["Customer", "Effective To Date"], &[&["A", "31/01/2023"], &["B", "garbage"]]));
        let cols = p.table.columns();
        assert_eq!(cols, &["Cliente", "Fecha Efectiva", "year_month", "year_month_display"]);

        let rows = p.table.rows();
        assert_eq!(rows[0][1], Value::Date(NaiveDate::from_ymd_opt(2023, 1, 31).unwrap()));
        assert_eq!(rows[0][2], Value::Text("2023-01".into()));
        assert_eq!(rows[0][3], Value::Text("2023-01".into()));
        assert!(rows[1][1].is_missing());
        assert!(rows[1][2].is_missing());
        assert!(rows[1][3].is_missing());
    }

    #[test]
    fn whole_number_columns_are_marked_integer() {
        let p = prepare(raw(
            &["Monthly Premium Auto", "Income", "Total Claim Amount", "Customer"],
            &[&["69", "56.274", "384,81", "A"], &["94", "", "1e3", "B"]],
        ));
        assert!(p.table.is_integer_column("Prima Mensual Auto"));
        // A missing cell makes the column fractional
        assert!(!p.table.is_integer_column("Ingreso"));
        assert!(!p.table.is_integer_column("Monto Total Reclamos"));
        assert!(!p.table.is_integer_column("Cliente"));
    }

    #[test]
    fn empty_table_has_no_integer_columns() {
        let p = prepare(raw(&["Monthly Premium Auto"], &[]));
        assert!(!p.table.is_integer_column("Prima Mensual Auto"));
    }

    #[test]
    fn no_date_column_means_no_derived_columns() {
        let p = prepare(raw(&["Customer"], &[&["A"]]));
        assert!(!p.table.has_column("year_month"));
        assert!(!p.table.has_column("year_month_display"));
    }

    #[test]
    fn short_rows_and_empty_text_become_missing() {
        let p = prepare(raw(&["Customer", "State", "Income"], &[&["A"], &["", "Oregon", "10"]]));
        let rows = p.table.rows();
        assert_eq!(rows[0][0], Value::Text("A".into()));
        assert!(rows[0][1].is_missing());
        assert!(rows[0][2].is_missing());
        assert!(rows[1][0].is_missing());
        assert_eq!(p.report.total(), 0);
    }
}
