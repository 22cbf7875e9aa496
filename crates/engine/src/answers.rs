//! Response table: intent key -> precomputed answer text.
//!
//! Built once from the record table. Lookup is substring containment of the
//! response key inside the resolved intent key, scanned in declaration order.

use serde::Serialize;

use crate::coerce::{format_integer, format_number};
use crate::columns::{COVERAGE, CUSTOMER, MONTHLY_PREMIUM, POLICY_TYPE, SALES_CHANNEL, STATE};
use crate::table::RecordTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseTable {
    answers: Vec<Answer>,
}

impl ResponseTable {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self { answers }
    }

    /// Compute the stock answers from the loaded records. Absent columns
    /// produce zero counts and empty lists.
    pub fn from_records(records: &RecordTable) -> Self {
        let list = |column: &str| records.unique_values(column).join(", ");
        let policy_types = records.unique_values(POLICY_TYPE);
        let premium = records.sum(MONTHLY_PREMIUM);
        let premium = if records.is_integer_column(MONTHLY_PREMIUM) {
            format_integer(premium)
        } else {
            format_number(premium)
        };

        let answers = vec![
            ("saludo", "Hola, ¿en qué te puedo ayudar?".to_string()),
            (
                "clientes",
                format!(
                    "Actualmente tenemos un total de {} clientes registrados.",
                    records.distinct_count(CUSTOMER)
                ),
            ),
            ("cobertura", format!("Las coberturas disponibles son: {}", list(COVERAGE))),
            (
                "cargo_mensual",
                format!("Los cargos mensuales acumulados son: {premium}"),
            ),
            ("ventas", format!("Los canales de venta disponibles son: {}", list(SALES_CHANNEL))),
            (
                "poliza",
                format!(
                    "Existen {} tipos de pólizas: {}",
                    policy_types.len(),
                    policy_types.join(", ")
                ),
            ),
            ("estado", format!("Los estados donde tenemos clientes son: {}", list(STATE))),
        ];

        Self {
            answers: answers
                .into_iter()
                .map(|(key, text)| Answer { key: key.to_string(), text })
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.text.as_str())
    }

    /// First answer whose key is contained in `intent`. An empty intent
    /// never matches.
    pub fn dispatch(&self, intent: &str) -> Option<&Answer> {
        if intent.is_empty() {
            return None;
        }
        self.answers.iter().find(|a| intent.contains(a.key.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::prepare;
    use crate::table::{RawTable, Value};

    fn records() -> RecordTable {
        let mut t = RecordTable::new(
            [CUSTOMER, STATE, COVERAGE, MONTHLY_PREMIUM, POLICY_TYPE, SALES_CHANNEL]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let text = |s: &str| Value::Text(s.into());
        t.push_row(vec![text("BU79786"), text("Washington"), text("Basic"), Value::Number(69.0), text("Corporate Auto"), text("Agent")]);
        t.push_row(vec![text("QZ44356"), text("Arizona"), text("Extended"), Value::Number(94.0), text("Personal Auto"), text("Agent")]);
        t.push_row(vec![text("AI49188"), text("Nevada"), text("Premium"), Value::Missing, text("Personal Auto"), text("Call Center")]);
        t.push_row(vec![text("BU79786"), text("Washington"), text("Basic"), Value::Number(106.0), text("Corporate Auto"), text("Branch")]);
        t
    }

    #[test]
    fn stock_answers_from_aggregates() {
        let r = ResponseTable::from_records(&records());
        assert_eq!(r.len(), 7);
        assert_eq!(r.get("saludo"), Some("Hola, ¿en qué te puedo ayudar?"));
        assert_eq!(
            r.get("clientes"),
            Some("Actualmente tenemos un total de 3 clientes registrados.")
        );
        assert_eq!(
            r.get("cobertura"),
            Some("Las coberturas disponibles son: Basic, Extended, Premium")
        );
        assert_eq!(
            r.get("cargo_mensual"),
            Some("Los cargos mensuales acumulados son: 269.0")
        );
        assert_eq!(
            r.get("ventas"),
            Some("Los canales de venta disponibles son: Agent, Call Center, Branch")
        );
        assert_eq!(
            r.get("poliza"),
            Some("Existen 2 tipos de pólizas: Corporate Auto, Personal Auto")
        );
        assert_eq!(
            r.get("estado"),
            Some("Los estados donde tenemos clientes son: Washington, Arizona, Nevada")
        );
    }

    #[test]
    fn absent_columns_yield_empty_aggregates() {
        let r = ResponseTable::from_records(&RecordTable::new(Vec::new()));
        assert_eq!(
            r.get("clientes"),
            Some("Actualmente tenemos un total de 0 clientes registrados.")
        );
        assert_eq!(r.get("cobertura"), Some("Las coberturas disponibles son: "));
        assert_eq!(r.get("cargo_mensual"), Some("Los cargos mensuales acumulados son: 0.0"));
    }

    fn premiums(cells: &[&str]) -> RecordTable {
        let raw = RawTable {
            headers: vec!["Customer".into(), "Monthly Premium Auto".into()],
            rows: cells.iter().map(|c| vec!["A".to_string(), c.to_string()]).collect(),
        };
        prepare(raw).table
    }

    #[test]
    fn whole_number_premiums_sum_without_decimal() {
        let r = ResponseTable::from_records(&premiums(&["69", "94"]));
        assert_eq!(r.get("cargo_mensual"), Some("Los cargos mensuales acumulados son: 163"));
    }

    #[test]
    fn missing_premium_keeps_float_sum() {
        let r = ResponseTable::from_records(&premiums(&["69", "", "94"]));
        assert_eq!(r.get("cargo_mensual"), Some("Los cargos mensuales acumulados son: 163.0"));

        let r = ResponseTable::from_records(&premiums(&["69", "n/a"]));
        assert_eq!(r.get("cargo_mensual"), Some("Los cargos mensuales acumulados son: 69.0"));
    }

    #[test]
    fn dispatch_is_substring_containment() {
        let r = ResponseTable::from_records(&records());
        assert_eq!(r.dispatch("cobertura").unwrap().key, "cobertura");
        // Response key inside a longer intent key still matches
        assert_eq!(r.dispatch("cobertura_extra").unwrap().key, "cobertura");
        assert_eq!(r.dispatch("mis_clientes_vip").unwrap().key, "clientes");
        // The reverse direction does not
        assert!(r.dispatch("cob").is_none());
        assert!(r.dispatch("").is_none());
    }

    #[test]
    fn dispatch_scans_in_declaration_order() {
        let r = ResponseTable::new(vec![
            Answer { key: "ventas".into(), text: "first".into() },
            Answer { key: "cargo".into(), text: "second".into() },
        ]);
        assert_eq!(r.dispatch("cargo_ventas").unwrap().text, "first");
    }
}
