//! Run-scoped storage.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::StorageError;
use crate::template;
use crate::value::display_value;

/// Name → value store shared by every actor of a run.
///
/// There is no scoping: a value set anywhere in the tree is visible to every
/// actor driven afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storage {
  values: HashMap<String, Value>,
}

impl Storage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get a value by name.
  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  /// Get a value by name, failing if it is not stored.
  pub fn require(&self, name: &str) -> Result<&Value, StorageError> {
    self.values.get(name).ok_or_else(|| StorageError::MissingKey {
      name: name.to_string(),
    })
  }

  /// Store a value, returning the previous one.
  pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.values.insert(name.into(), value.into())
  }

  /// Remove a value, returning it if it was stored.
  pub fn delete(&mut self, name: &str) -> Option<Value> {
    self.values.remove(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn clear(&mut self) {
    self.values.clear();
  }

  /// Stored names in sorted order.
  pub fn names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Replace every `@{name}` in `text` with the string form of the stored value.
  ///
  /// Single pass, not recursive; an unknown name is an error.
  pub fn expand(&self, text: &str) -> Result<String, StorageError> {
    template::expand_with(text, |name| self.values.get(name).map(display_value))
  }
}
