//! Lossy string -> number/date coercion. Failures yield `None`, never an error.

use chrono::{Datelike, NaiveDate};

/// Remove thousands/currency punctuation: every `.`, then every `,`, then
/// every `$`, then surrounding whitespace.
///
/// The order is observable: `"1.234,56"` becomes `"123456"`, not `1234.56`.
pub fn strip_numeric(raw: &str) -> String {
    raw.replace('.', "")
        .replace(',', "")
        .replace('$', "")
        .trim()
        .to_string()
}

/// Strip punctuation and parse as `f64`. Empty, unparseable and non-finite
/// values all become `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let cleaned = strip_numeric(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when the cleaned cell is a whole-number literal (`69`, `1.234`,
/// `-5`). A column made only of these sums to an integer.
pub fn is_integer_literal(raw: &str) -> bool {
    let cleaned = strip_numeric(raw);
    !cleaned.is_empty() && cleaned.parse::<i64>().is_ok()
}

/// Parse a date with day-first preference.
///
/// Accepts `d/m/Y`, `d-m-Y` and `d.m.Y` (two-digit years map to 1970-2069),
/// plus ISO `Y-m-d`. A trailing time component (`2023-01-31 00:00:00`) is
/// ignored. When the day-first reading is not a real date but the
/// month-first one is (`01/31/2023`), the month-first reading is used.
/// English month names are accepted too (`24 Feb 2011`, `February 24, 2011`).
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'T') {
        if let Some(date) = parse_month_name(trimmed) {
            return Some(date);
        }
    }

    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or("");
    if date_part.is_empty() {
        return None;
    }

    let sep = date_part.chars().find(|c| matches!(c, '/' | '-' | '.'))?;
    let parts: Vec<&str> = date_part.split(sep).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let nums: Vec<u32> = parts.iter().map(|p| p.parse().ok()).collect::<Option<_>>()?;

    // Year-first only when the leading field is a four-digit year
    if parts[0].len() == 4 {
        return NaiveDate::from_ymd_opt(nums[0] as i32, nums[1], nums[2]);
    }

    let year = expand_year(parts[2], nums[2])?;
    NaiveDate::from_ymd_opt(year, nums[1], nums[0])
        .or_else(|| NaiveDate::from_ymd_opt(year, nums[0], nums[1]))
}

// `%B` also matches the three-letter abbreviation, case-insensitively.
// Two-digit year forms come first: `%Y` would read `11` as year 11.
const MONTH_NAME_FORMATS: &[&str] = &[
    "%d %B %y",
    "%d-%B-%y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%d/%B/%Y",
    "%B %d %Y",
    "%B %d, %Y",
];

fn parse_month_name(text: &str) -> Option<NaiveDate> {
    MONTH_NAME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

fn expand_year(text: &str, value: u32) -> Option<i32> {
    match text.len() {
        1 | 2 => Some(if value < 70 { 2000 + value as i32 } else { 1900 + value as i32 }),
        4 => Some(value as i32),
        _ => None,
    }
}

/// Month bucket for grouping: `2023-01`.
pub fn month_bucket(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Month display string, `%Y-%m`.
pub fn month_display(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Render a float the way Python's `str(float)` does: integral values keep
/// a single decimal (`3.0`), and the shortest round-trip digits switch to
/// scientific notation below `1e-4` or from `1e16` up (`1e-05`, `1.5e+16`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` gives the shortest round-trip mantissa, e.g. `1.5e16`
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = format!("{value}");
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Render a sum of whole-number cells without a decimal part (`655`).
pub fn format_integer(value: f64) -> String {
    format!("{}", value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_is_stripped_before_comma() {
        assert_eq!(strip_numeric("1.234,56"), "123456");
        assert_eq!(coerce_number("1.234,56"), Some(123456.0));
    }

    #[test]
    fn currency_and_whitespace_are_stripped() {
        assert_eq!(coerce_number(" $2,763.52 "), Some(276352.0));
        assert_eq!(coerce_number("$ 69"), Some(69.0));
        assert_eq!(coerce_number("0"), Some(0.0));
    }

    #[test]
    fn unparseable_values_become_none() {
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("   "), None);
        assert_eq!(coerce_number("n/a"), None);
        assert_eq!(coerce_number("12abc"), None);
        assert_eq!(coerce_number("$.,"), None);
    }

    #[test]
    fn non_finite_values_become_none() {
        assert_eq!(coerce_number("inf"), None);
        assert_eq!(coerce_number("NaN"), None);
        assert_eq!(coerce_number("-infinity"), None);
    }

    #[test]
    fn negative_and_exponent_forms_parse() {
        assert_eq!(coerce_number("-15"), Some(-15.0));
        assert_eq!(coerce_number("1e3"), Some(1000.0));
    }

    #[test]
    fn day_first_slash_date() {
        let d = parse_day_first("31/01/2023").unwrap();
        assert_eq!(d, ymd(2023, 1, 31));
        assert_eq!(month_bucket(d), "2023-01");
        assert_eq!(month_display(d), "2023-01");
    }

    #[test]
    fn ambiguous_date_prefers_day_first() {
        assert_eq!(parse_day_first("02/03/2011"), Some(ymd(2011, 3, 2)));
    }

    #[test]
    fn impossible_day_first_falls_back_to_month_first() {
        assert_eq!(parse_day_first("2/24/11"), Some(ymd(2011, 2, 24)));
        assert_eq!(parse_day_first("01/31/2023"), Some(ymd(2023, 1, 31)));
    }

    #[test]
    fn other_separators_and_iso() {
        assert_eq!(parse_day_first("15-06-2020"), Some(ymd(2020, 6, 15)));
        assert_eq!(parse_day_first("15.06.2020"), Some(ymd(2020, 6, 15)));
        assert_eq!(parse_day_first("2020-06-15"), Some(ymd(2020, 6, 15)));
        assert_eq!(parse_day_first("2020-06-15 00:00:00"), Some(ymd(2020, 6, 15)));
    }

    #[test]
    fn two_digit_years_pivot_at_70() {
        assert_eq!(parse_day_first("01/01/69"), Some(ymd(2069, 1, 1)));
        assert_eq!(parse_day_first("01/01/70"), Some(ymd(1970, 1, 1)));
    }

    #[test]
    fn invalid_dates_become_none() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("not a date"), None);
        assert_eq!(parse_day_first("32/13/2023"), None);
        assert_eq!(parse_day_first("31/02/2023"), None);
        assert_eq!(parse_day_first("1/2"), None);
        assert_eq!(parse_day_first("01/01/123"), None);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(3.0), "3.0");
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(123456.0), "123456.0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-7.25), "-7.25");
    }

    #[test]
    fn number_formatting_switches_to_exponent_at_python_thresholds() {
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(0.000015), "1.5e-05");
        assert_eq!(format_number(1e15), "1000000000000000.0");
        assert_eq!(format_number(1e16), "1e+16");
        assert_eq!(format_number(-1.5e16), "-1.5e+16");
        assert_eq!(format_number(1.2345e100), "1.2345e+100");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NAN), "nan");
    }

    #[test]
    fn integer_sums_print_without_decimal() {
        assert_eq!(format_integer(655.0), "655");
        assert_eq!(format_integer(0.0), "0");
        assert_eq!(format_integer(-12.0), "-12");
    }

    #[test]
    fn integer_literals_after_stripping() {
        assert!(is_integer_literal("69"));
        assert!(is_integer_literal(" 1.234 "));
        assert!(is_integer_literal("$2,500"));
        assert!(is_integer_literal("-5"));
        assert!(!is_integer_literal(""));
        assert!(!is_integer_literal("n/a"));
        assert!(!is_integer_literal("1e3"));
    }

    #[test]
    fn month_names_parse() {
        assert_eq!(parse_day_first("24 Feb 2011"), Some(ymd(2011, 2, 24)));
        assert_eq!(parse_day_first("24-feb-2011"), Some(ymd(2011, 2, 24)));
        assert_eq!(parse_day_first("24 February 2011"), Some(ymd(2011, 2, 24)));
        assert_eq!(parse_day_first("February 24, 2011"), Some(ymd(2011, 2, 24)));
        assert_eq!(parse_day_first("03 Mar 11"), Some(ymd(2011, 3, 3)));
        assert_eq!(parse_day_first("31 Feb 2011"), None);
    }
}
