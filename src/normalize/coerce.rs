//! Cell coercion. None of these functions fail: a malformed cell degrades to
//! `None` (or 0.0 / false in the typed wrappers) and processing continues.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Tokens that mark a flag cell as set (compared trimmed, case-insensitive).
pub const DEFAULT_TRUTHY_TOKENS: [&str; 5] = ["x", "1", "true", "yes", "y"];

/// Text of a cell; blank strings count as absent.
pub fn cell_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole numbers render without a fractional part ("7", not "7.0"),
/// so numeric ids and `1` flags compare as the sheet shows them.
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

pub fn is_present(v: Option<&Value>) -> bool {
    cell_text(v).is_some()
}

/// Numeric value of a cell, `None` when empty or unparseable.
pub fn cell_number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    (!n.is_nan()).then_some(n)
}

/// Currency-like fields: missing or unparseable → 0.0.
pub fn amount(v: Option<&Value>) -> f64 {
    cell_number(v).unwrap_or(0.0)
}

/// Cell and token are both compared trimmed and case-insensitive.
pub fn is_truthy(v: Option<&Value>, tokens: &[String]) -> bool {
    match cell_text(v) {
        Some(s) => {
            let s = s.to_lowercase();
            tokens.iter().any(|t| t.trim().to_lowercase() == s)
        }
        None => false,
    }
}

pub fn default_tokens() -> Vec<String> {
    DEFAULT_TRUTHY_TOKENS.iter().map(|t| t.to_string()).collect()
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Excel serial day numbers above this are past year 9999.
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Date or date-time cell; anything unrecognised is `None`.
pub fn cell_datetime(v: Option<&Value>) -> Option<NaiveDateTime> {
    match v? {
        Value::String(s) => parse_datetime_str(s.trim()),
        Value::Number(n) => excel_serial(n.as_f64()?),
        _ => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(dt);
        }
    }
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Excel stores dates as days since 1899-12-30 (fraction = time of day).
fn excel_serial(days: f64) -> Option<NaiveDateTime> {
    if !(days.is_finite() && days > 0.0 && days <= EXCEL_MAX_SERIAL) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let secs = (days * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokens() -> Vec<String> {
        default_tokens()
    }

    #[test]
    fn numbers_fall_back_to_zero() {
        assert_eq!(amount(Some(&json!(1250.5))), 1250.5);
        assert_eq!(amount(Some(&json!(" 300 "))), 300.0);
        assert_eq!(amount(Some(&json!("$1,200"))), 0.0);
        assert_eq!(amount(Some(&json!("n/a"))), 0.0);
        assert_eq!(amount(Some(&json!(null))), 0.0);
        assert_eq!(amount(Some(&json!("NaN"))), 0.0);
        assert_eq!(amount(None), 0.0);
    }

    #[test]
    fn flag_tokens_are_trimmed_and_case_insensitive() {
        let t = tokens();
        for raw in [json!("x"), json!(" X "), json!("Yes"), json!("TRUE"), json!("y"), json!(1), json!(true)] {
            assert!(is_truthy(Some(&raw), &t), "{raw} should be truthy");
        }
        for raw in [json!(""), json!("no"), json!("0"), json!(0), json!(null), json!("xx"), json!(2)] {
            assert!(!is_truthy(Some(&raw), &t), "{raw} should be falsy");
        }
        assert!(!is_truthy(None, &t));
    }

    #[test]
    fn uppercase_tokens_still_match() {
        let t = vec!["X".to_string(), " Done ".to_string()];
        assert!(is_truthy(Some(&json!("x")), &t));
        assert!(is_truthy(Some(&json!("DONE")), &t));
        assert!(!is_truthy(Some(&json!("yes")), &t));
    }

    #[test]
    fn float_one_is_a_truthy_flag() {
        assert!(is_truthy(Some(&json!(1.0)), &tokens()));
    }

    #[test]
    fn text_cells() {
        assert_eq!(cell_text(Some(&json!("  Acme "))), Some("Acme".into()));
        assert_eq!(cell_text(Some(&json!("   "))), None);
        assert_eq!(cell_text(Some(&json!(1042))), Some("1042".into()));
        assert_eq!(cell_text(Some(&json!(7.0))), Some("7".into()));
        assert_eq!(cell_text(Some(&json!([1]))), None);
    }

    #[test]
    fn dates_in_common_shapes() {
        let want = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(cell_datetime(Some(&json!("2025-03-14"))), Some(want));
        assert_eq!(cell_datetime(Some(&json!("03/14/2025"))), Some(want));
        assert_eq!(cell_datetime(Some(&json!("2025-03-14 00:00:00"))), Some(want));
        assert_eq!(cell_datetime(Some(&json!("2025-03-14T00:00:00Z"))), Some(want));
        // Excel serial for 2025-03-14
        assert_eq!(cell_datetime(Some(&json!(45730))), Some(want));
    }

    #[test]
    fn bad_dates_are_absent() {
        assert_eq!(cell_datetime(Some(&json!("next tuesday"))), None);
        assert_eq!(cell_datetime(Some(&json!(""))), None);
        assert_eq!(cell_datetime(Some(&json!(-3))), None);
        assert_eq!(cell_datetime(None), None);
    }
}
