//! Tokens: the messages exchanged between actors.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::display_value;

/// An immutable single-value message.
///
/// Two tokens are equal when their payloads are equal; metadata is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Token {
  payload: Value,
  #[serde(default, skip_serializing_if = "Map::is_empty")]
  metadata: Map<String, Value>,
}

impl Token {
  /// Create a token carrying the given payload.
  pub fn new(payload: impl Into<Value>) -> Self {
    Self {
      payload: payload.into(),
      metadata: Map::new(),
    }
  }

  /// The synthetic start token: a null payload.
  pub fn start() -> Self {
    Self::default()
  }

  /// Attach a metadata entry.
  pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.metadata.insert(key.into(), value.into());
    self
  }

  pub fn payload(&self) -> &Value {
    &self.payload
  }

  pub fn metadata(&self) -> &Map<String, Value> {
    &self.metadata
  }

  pub fn into_payload(self) -> Value {
    self.payload
  }
}

impl PartialEq for Token {
  fn eq(&self, other: &Self) -> bool {
    self.payload == other.payload
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&display_value(&self.payload))
  }
}
