// Cleaned table export (CSV / JSON)

use std::io::Write;

use serde_json::{Map, Value as JsonValue};

use clvchat_engine::{RecordTable, Value};

/// Write the cleaned table as delimited text. Missing cells are empty,
/// numbers use the answer formatting, dates are ISO `YYYY-MM-DD`.
pub fn write_csv<W: Write>(table: &RecordTable, writer: W, delimiter: u8) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(table.columns()).map_err(|e| e.to_string())?;
    for row in table.rows() {
        let record: Vec<String> = row.iter().map(|v| v.display().unwrap_or_default()).collect();
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

/// Write the cleaned table as a JSON array of objects keyed by column name,
/// in column order. Missing cells are `null`.
pub fn write_json<W: Write>(table: &RecordTable, mut writer: W) -> Result<(), String> {
    let rows: Vec<JsonValue> = table
        .rows()
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            for (column, value) in table.columns().iter().zip(row) {
                obj.insert(column.clone(), to_json(value));
            }
            JsonValue::Object(obj)
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &rows).map_err(|e| e.to_string())?;
    writeln!(writer).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}

fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Missing => JsonValue::Null,
        Value::Number(n) => serde_json::json!(n),
        other => other.display().map(JsonValue::String).unwrap_or(JsonValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clvchat_engine::{prepare, RawTable};

    fn table() -> RecordTable {
        let raw = RawTable {
            headers: vec!["Customer".into(), "Income".into(), "Effective To Date".into()],
            rows: vec![
                vec!["A".into(), "$56.274".into(), "31/01/2023".into()],
                vec!["B".into(), "n/a".into(), "".into()],
            ],
        };
        prepare(raw).table
    }

    #[test]
    fn test_csv_export() {
        let mut out = Vec::new();
        write_csv(&table(), &mut out, b';').unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Cliente;Ingreso;Fecha Efectiva;year_month;year_month_display");
        assert_eq!(lines[1], "A;56274.0;2023-01-31;2023-01;2023-01");
        assert_eq!(lines[2], "B;;;;");
    }

    #[test]
    fn test_json_export_keeps_column_order() {
        let mut out = Vec::new();
        write_json(&table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["Cliente"], "A");
        assert_eq!(parsed[0]["Ingreso"], 56274.0);
        assert_eq!(parsed[0]["Fecha Efectiva"], "2023-01-31");
        assert!(parsed[1]["Ingreso"].is_null());
        assert!(parsed[1]["year_month"].is_null());

        let cliente = text.find("\"Cliente\"").unwrap();
        let ingreso = text.find("\"Ingreso\"").unwrap();
        assert!(cliente < ingreso);
    }
}
