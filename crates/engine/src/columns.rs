//! Column names of the CLV dataset, before and after translation.

// ---------------------------------------------------------------------------
// Translated names referenced by the loader and the answer builders
// ---------------------------------------------------------------------------

pub const CUSTOMER: &str = "Cliente";
pub const STATE: &str = "Estado";
pub const LIFETIME_VALUE: &str = "Valor Vida Cliente";
pub const COVERAGE: &str = "Cobertura";
pub const EFFECTIVE_DATE: &str = "Fecha Efectiva";
pub const INCOME: &str = "Ingreso";
pub const MONTHLY_PREMIUM: &str = "Prima Mensual Auto";
pub const MONTHS_SINCE_CLAIM: &str = "Meses Desde Ultimo Reclamo";
pub const MONTHS_SINCE_INCEPTION: &str = "Meses Desde Inicio Poliza";
pub const OPEN_COMPLAINTS: &str = "Numero Quejas Abiertas";
pub const POLICY_COUNT: &str = "Numero Polizas";
pub const POLICY_TYPE: &str = "Tipo Poliza";
pub const SALES_CHANNEL: &str = "Canal Ventas";
pub const TOTAL_CLAIMS: &str = "Monto Total Reclamos";

/// Derived month bucket (`2023-01`), present only when the date column is.
pub const YEAR_MONTH: &str = "year_month";
/// Derived display string for the month bucket.
pub const YEAR_MONTH_DISPLAY: &str = "year_month_display";

/// Source header -> display name, in declaration order.
pub const TRANSLATIONS: &[(&str, &str)] = &[
    ("Customer", CUSTOMER),
    ("State", STATE),
    ("Customer Lifetime Value", LIFETIME_VALUE),
    ("Response", "Respuesta"),
    ("Coverage", COVERAGE),
    ("Education", "Educacion"),
    ("Effective To Date", EFFECTIVE_DATE),
    ("EmploymentStatus", "Estado Empleo"),
    ("Gender", "Genero"),
    ("Income", INCOME),
    ("Location Code", "Codigo Ubicacion"),
    ("Marital Status", "Estado Civil"),
    ("Monthly Premium Auto", MONTHLY_PREMIUM),
    ("Months Since Last Claim", MONTHS_SINCE_CLAIM),
    ("Months Since Policy Inception", MONTHS_SINCE_INCEPTION),
    ("Number of Open Complaints", OPEN_COMPLAINTS),
    ("Number of Policies", POLICY_COUNT),
    ("Policy Type", POLICY_TYPE),
    ("Policy", "Poliza"),
    ("Renew Offer Type", "Tipo Oferta Renovacion"),
    ("Sales Channel", SALES_CHANNEL),
    ("Total Claim Amount", TOTAL_CLAIMS),
    ("Vehicle Class", "Clase Vehiculo"),
    ("Vehicle Size", "Dimension Vehiculo"),
];

/// Columns coerced to numbers after punctuation stripping.
pub const NUMERIC_COLUMNS: &[&str] = &[
    LIFETIME_VALUE,
    TOTAL_CLAIMS,
    MONTHLY_PREMIUM,
    MONTHS_SINCE_CLAIM,
    MONTHS_SINCE_INCEPTION,
    OPEN_COMPLAINTS,
    POLICY_COUNT,
    INCOME,
];

/// Translate a source header, passing unknown headers through untouched.
pub fn translate(header: &str) -> &str {
    TRANSLATIONS
        .iter()
        .find(|(source, _)| *source == header)
        .map(|(_, target)| *target)
        .unwrap_or(header)
}

pub fn is_numeric(column: &str) -> bool {
    NUMERIC_COLUMNS.contains(&column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_headers_translate() {
        assert_eq!(translate("Customer"), "Cliente");
        assert_eq!(translate("Effective To Date"), "Fecha Efectiva");
        assert_eq!(translate("Vehicle Size"), "Dimension Vehiculo");
    }

    #[test]
    fn policy_and_policy_type_stay_distinct() {
        assert_eq!(translate("Policy"), "Poliza");
        assert_eq!(translate("Policy Type"), "Tipo Poliza");
    }

    #[test]
    fn unknown_headers_pass_through() {
        assert_eq!(translate("Loyalty Tier"), "Loyalty Tier");
        // Already-translated names are not translated twice
        assert_eq!(translate("Cliente"), "Cliente");
    }

    #[test]
    fn every_numeric_column_is_a_translation_target() {
        for col in NUMERIC_COLUMNS {
            assert!(
                TRANSLATIONS.iter().any(|(_, target)| target == col),
                "{col} has no source header"
            );
        }
    }
}
