//! Record values and loose value comparison.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde_json::Value;

/// One row: field name to value, in field order.
pub type Record = IndexMap<String, Value>;

/// Renders a value the way it travels in form encoding.
///
/// `Null` has no textual form. Booleans become `"1"`/`"0"`, matching how
/// boolean columns are stored.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Value as text, with `Null` rendered empty.
pub fn value_text(value: &Value) -> String {
    value_to_string(value).unwrap_or_default()
}

/// Numeric reading of a value, accepting numeric strings and booleans.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// True for `Null` and the empty string.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Compares two values: numerically when both read as numbers,
/// otherwise by their text. `Null` orders before everything.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }
    if let (Some(x), Some(y)) = (value_as_f64(a), value_as_f64(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    value_text(a).cmp(&value_text(b))
}

/// Equality under [`compare_values`].
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Ordering::Equal
}
