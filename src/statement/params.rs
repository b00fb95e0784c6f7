//! Positional bound parameters
//!
//! Parameters arrive as JSON values in statement order. The calling layer is
//! loose about scalar types (route handlers pass query-string values as
//! strings, form handlers pass numbers), so accessors coerce between numeric
//! strings and numbers the way the hosted driver does.

use serde_json::Value;

use super::errors::{StatementError, StatementResult};

/// Normalize bind-call arguments: a single array argument carries the whole
/// parameter list and is flattened.
pub fn flatten(args: Vec<Value>) -> Vec<Value> {
    if let [Value::Array(items)] = args.as_slice() {
        return items.clone();
    }
    args
}

/// Required integer parameter (number or numeric string).
pub fn int_at(params: &[Value], idx: usize) -> StatementResult<i64> {
    match params.get(idx) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| mismatch(idx, "integer", "non-integer number")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| mismatch(idx, "integer", "non-numeric string")),
        Some(other) => Err(mismatch(idx, "integer", type_name(other))),
        None => Err(missing(idx)),
    }
}

/// Required text parameter (strings pass through, numbers stringify).
pub fn text_at(params: &[Value], idx: usize) -> StatementResult<String> {
    match params.get(idx) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(mismatch(idx, "text", type_name(other))),
        None => Err(missing(idx)),
    }
}

/// Optional text parameter; absent, null, or blank means "use the default".
pub fn opt_text_at(params: &[Value], idx: usize) -> Option<String> {
    match params.get(idx) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Required flag parameter: `1` or `true` means true, anything else false.
pub fn bool_at(params: &[Value], idx: usize) -> StatementResult<bool> {
    match params.get(idx) {
        Some(value) => Ok(truthy(value)),
        None => Err(missing(idx)),
    }
}

/// Optional flag parameter; absent or null means "use the default".
pub fn opt_bool_at(params: &[Value], idx: usize) -> Option<bool> {
    match params.get(idx) {
        Some(Value::Null) | None => None,
        Some(value) => Some(truthy(value)),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "1" || s == "true",
        _ => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(idx: usize, expected: &str, actual: &str) -> StatementError {
    StatementError::parameter_mismatch(format!(
        "parameter {}: expected {}, got {}",
        idx, expected, actual
    ))
}

fn missing(idx: usize) -> StatementError {
    StatementError::parameter_mismatch(format!("parameter {} is missing", idx))
}
