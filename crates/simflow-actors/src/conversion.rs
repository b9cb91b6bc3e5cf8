//! Value conversions applied by the [`Convert`](crate::Convert) transformer.
//!
//! A conversion is configured either by name (`"StringToNumber"`) or by an
//! object carrying a `type` plus the conversion's own settings
//! (`{ "type": "StringToNumber", "integer": true }`).

use std::fmt;

use serde_json::{Map, Number, Value};
use simflow_core::ActorError;
use simflow_core::value::display_value;

const OPTION: &str = "conversion";

/// A payload conversion.
pub trait Conversion: Send + fmt::Debug {
  fn name(&self) -> &'static str;

  fn description(&self) -> &'static str;

  /// Reject payloads the conversion cannot handle.
  fn check_input(&self, _value: &Value) -> Result<(), ActorError> {
    Ok(())
  }

  /// Convert a payload; `None` drops the token.
  fn convert(&self, value: Value) -> Result<Option<Value>, ActorError>;
}

/// Names accepted by [`from_value`].
pub const NAMES: &[&str] = &["PassThrough", "AnyToString", "StringToNumber"];

/// The available conversions with their descriptions, as shown after the
/// help of [`Convert`](crate::Convert).
pub fn help() -> String {
  let mut lines = vec!["Conversions:".to_string()];
  for conversion in NAMES.iter().filter_map(|name| from_parts(name, &Map::new()).ok()) {
    lines.push(conversion.name().to_string());
    lines.push(format!("  {}", conversion.description()));
  }
  lines.join("\n")
}

/// Build a conversion from its option value.
pub fn from_value(value: &Value) -> Result<Box<dyn Conversion>, ActorError> {
  match value {
    Value::String(name) => from_parts(name, &Map::new()),
    Value::Object(settings) => {
      let name = settings
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ActorError::invalid_option(OPTION, "object is missing a 'type'"))?;
      from_parts(name, settings)
    }
    other => Err(ActorError::invalid_option(
      OPTION,
      format!("expected a conversion name or object, got {}", other),
    )),
  }
}

fn from_parts(name: &str, settings: &Map<String, Value>) -> Result<Box<dyn Conversion>, ActorError> {
  let allowed: &[&str] = match name {
    "StringToNumber" => &["type", "integer"],
    _ => &["type"],
  };
  if let Some(key) = settings.keys().find(|k| !allowed.contains(&k.as_str())) {
    return Err(ActorError::invalid_option(
      OPTION,
      format!("unknown setting '{}' for {}", key, name),
    ));
  }

  match name {
    "PassThrough" => Ok(Box::new(PassThrough)),
    "AnyToString" => Ok(Box::new(AnyToString)),
    "StringToNumber" => {
      let integer = match settings.get("integer") {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
          return Err(ActorError::invalid_option(
            OPTION,
            format!("'integer' must be a boolean, got {}", other),
          ));
        }
      };
      Ok(Box::new(StringToNumber { integer }))
    }
    other => Err(ActorError::invalid_option(
      OPTION,
      format!("unknown conversion '{}' (known: {})", other, NAMES.join(", ")),
    )),
  }
}

/// Returns the payload unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Conversion for PassThrough {
  fn name(&self) -> &'static str {
    "PassThrough"
  }

  fn description(&self) -> &'static str {
    "Dummy conversion, just passes through the data."
  }

  fn convert(&self, value: Value) -> Result<Option<Value>, ActorError> {
    Ok(Some(value))
  }
}

/// Turns any payload into its string form.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyToString;

impl Conversion for AnyToString {
  fn name(&self) -> &'static str {
    "AnyToString"
  }

  fn description(&self) -> &'static str {
    "Turns any payload into its string representation."
  }

  fn convert(&self, value: Value) -> Result<Option<Value>, ActorError> {
    Ok(Some(Value::String(display_value(&value))))
  }
}

/// Parses string payloads as numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToNumber {
  /// Parse as an integer instead of a float.
  pub integer: bool,
}

impl Conversion for StringToNumber {
  fn name(&self) -> &'static str {
    "StringToNumber"
  }

  fn description(&self) -> &'static str {
    "Parses a string payload as a number."
  }

  fn check_input(&self, value: &Value) -> Result<(), ActorError> {
    if value.is_string() {
      Ok(())
    } else {
      Err(ActorError::unsupported_input(format!(
        "StringToNumber expects a string, got {}",
        value
      )))
    }
  }

  fn convert(&self, value: Value) -> Result<Option<Value>, ActorError> {
    let text = display_value(&value);
    let text = text.trim();
    let parsed = if self.integer {
      text.parse::<i64>().ok().map(Value::from)
    } else {
      text
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
    };
    parsed
      .map(Some)
      .ok_or_else(|| ActorError::failed(format!("cannot parse '{}' as a number", text)))
  }
}
