use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9+\-.]").unwrap());

/// Coerces a scraped table cell to a plain number. Total: never panics,
/// never errors. Numbers pass through unchanged; strings are stripped of
/// currency symbols, separators, footnote markers and the like before
/// parsing; anything unparsable becomes 0.0 so downstream arithmetic
/// never faults.
pub fn normalize(cell: &Value) -> f64 {
    normalize_checked(cell).0
}

/// Like [`normalize`], but also reports whether the cell parsed cleanly.
/// A `false` flag means the value fell back to 0.0 and belongs on the
/// extraction's warnings channel.
pub fn normalize_checked(cell: &Value) -> (f64, bool) {
    match cell {
        Value::Number(n) => (n.as_f64().unwrap_or(0.0), true),
        Value::String(s) => {
            let cleaned = NON_NUMERIC.replace_all(s, "");
            match cleaned.parse::<f64>() {
                Ok(v) => (v, true),
                Err(_) => (0.0, false),
            }
        }
        _ => (0.0, false),
    }
}
