//! Conversions between JSON values and the text and scalar forms actors need.

use serde_json::Value;

/// String form of a value as used by template expansion and sinks.
///
/// Strings are rendered without quotes; everything else uses its JSON form.
pub fn display_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Interpret a value as an integer.
///
/// Accepts integral numbers and strings that parse as integers, which is what
/// an option like `"@{max}"` turns into after expansion.
pub fn as_i64(value: &Value) -> Option<i64> {
  match value {
    Value::Number(n) => n.as_i64().or_else(|| {
      n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.is_finite())
        .map(|f| f as i64)
    }),
    Value::String(s) => {
      let s = s.trim();
      s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
          .ok()
          .filter(|f| f.fract() == 0.0 && f.is_finite())
          .map(|f| f as i64)
      })
    }
    _ => None,
  }
}

/// Interpret a value as a boolean.
pub fn as_bool(value: &Value) -> Option<bool> {
  match value {
    Value::Bool(b) => Some(*b),
    Value::String(s) => match s.trim().to_lowercase().as_str() {
      "true" => Some(true),
      "false" => Some(false),
      _ => None,
    },
    _ => None,
  }
}
