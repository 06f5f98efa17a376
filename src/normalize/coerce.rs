//! Field Coercion
//!
//! Lenient conversions from untyped JSON values into entity field types.
//! Nothing here fails; unusable input becomes the target's zero value.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::normalize::row::{unwrap_value, CanonicalRow};

/// Generic string conversion. `Null` becomes `""`, strings pass through,
/// other values use their JSON text.
pub fn as_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers as-is, strings by their leading numeric token (`"12.5 IDR"` is
/// 12.5), anything else 0. Booleans are not numbers here.
pub fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => leading_number(s),
        _ => 0.0,
    }
}

/// Longest parseable float at the start of `s`, after leading whitespace.
fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .unwrap_or(s.len());

    // The candidate is ASCII, so every byte index is a char boundary
    let mut token = &s[..end];
    while !token.is_empty() {
        if let Ok(n) = token.parse::<f64>() {
            return n;
        }
        token = &token[..token.len() - 1];
    }
    0.0
}

/// Integer view of a value. Floats are truncated toward zero.
pub fn as_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or_default()
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Booleans as-is, `"true"`/`"1"` strings and non-zero numbers are true.
pub fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// RFC 3339 timestamp string, or `None`.
pub fn as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// == Row Accessors ==
/// Typed field access on a normalized row.
///
/// Each accessor unwraps the field with [`unwrap_value`] before coercion and
/// treats a missing field like `Null`.
pub trait RowExt {
    fn field(&self, name: &str) -> &Value;

    fn str_field(&self, name: &str) -> String {
        as_string(self.field(name))
    }

    fn f64_field(&self, name: &str) -> f64 {
        as_f64(self.field(name))
    }

    fn i64_field(&self, name: &str) -> i64 {
        as_i64(self.field(name))
    }

    fn bool_field(&self, name: &str) -> bool {
        as_bool(self.field(name))
    }

    fn datetime_field(&self, name: &str) -> Option<DateTime<Utc>> {
        as_datetime(self.field(name))
    }
}

impl RowExt for CanonicalRow {
    fn field(&self, name: &str) -> &Value {
        self.get(name).map(unwrap_value).unwrap_or(&Value::Null)
    }
}
