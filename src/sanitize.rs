//! JSON-safety sanitization
//!
//! Strict JSON cannot represent `NaN` or ±∞, so every analytics value crosses
//! this walk before it is persisted or serialized. The walk recurses through
//! objects and arrays to arbitrary depth and replaces any number that does not
//! round-trip as a finite `f64` with null; everything else passes through
//! untouched. Sanitizing an already-sanitized value is a no-op.

use serde_json::Value;

/// Replace every non-finite number in a JSON value tree with null
#[must_use]
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => Value::Null,
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, inner)| (key, sanitize(inner)))
                .collect(),
        ),
        other => other,
    }
}

/// True if no non-finite number appears anywhere in the value tree
#[must_use]
pub fn is_sanitized(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().map_or(true, f64::is_finite),
        Value::Array(items) => items.iter().all(is_sanitized),
        Value::Object(entries) => entries.values().all(is_sanitized),
        _ => true,
    }
}
