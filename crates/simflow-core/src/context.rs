//! Per-invocation view of the run handed to an actor.

use serde_json::Value;

use crate::error::ActorError;
use crate::expression::ExpressionEvaluator;
use crate::options::Options;
use crate::storage::Storage;
use crate::value::{as_bool, as_i64, display_value};

/// What an actor sees while it executes: its normalized options, the shared
/// storage and the expression capability.
pub struct ActorContext<'a> {
  full_name: &'a str,
  options: &'a Options,
  storage: &'a mut Storage,
  evaluator: &'a dyn ExpressionEvaluator,
}

impl<'a> ActorContext<'a> {
  pub fn new(
    full_name: &'a str,
    options: &'a Options,
    storage: &'a mut Storage,
    evaluator: &'a dyn ExpressionEvaluator,
  ) -> Self {
    Self {
      full_name,
      options,
      storage,
      evaluator,
    }
  }

  /// Full path of the executing actor.
  pub fn full_name(&self) -> &str {
    self.full_name
  }

  pub fn storage(&self) -> &Storage {
    self.storage
  }

  pub fn storage_mut(&mut self) -> &mut Storage {
    self.storage
  }

  /// The normalized option value, without template expansion.
  pub fn option(&self, name: &str) -> Result<&Value, ActorError> {
    self
      .options
      .get(name)
      .ok_or_else(|| ActorError::invalid_option(name, "is not configured"))
  }

  /// The option value with `@{...}` expanded when it is a string.
  ///
  /// Non-string values are returned unchanged.
  pub fn resolve(&self, name: &str) -> Result<Value, ActorError> {
    match self.option(name)? {
      Value::String(text) => Ok(Value::String(self.storage.expand(text)?)),
      other => Ok(other.clone()),
    }
  }

  /// Resolve an option to its string form.
  pub fn resolve_string(&self, name: &str) -> Result<String, ActorError> {
    Ok(display_value(&self.resolve(name)?))
  }

  pub fn resolve_i64(&self, name: &str) -> Result<i64, ActorError> {
    let value = self.resolve(name)?;
    as_i64(&value)
      .ok_or_else(|| ActorError::invalid_option(name, format!("expected an integer, got {}", value)))
  }

  pub fn resolve_bool(&self, name: &str) -> Result<bool, ActorError> {
    let value = self.resolve(name)?;
    as_bool(&value)
      .ok_or_else(|| ActorError::invalid_option(name, format!("expected a boolean, got {}", value)))
  }

  /// Expand `@{...}` placeholders in arbitrary text.
  pub fn expand(&self, text: &str) -> Result<String, ActorError> {
    Ok(self.storage.expand(text)?)
  }

  pub fn evaluate(&self, expression: &str) -> Result<Value, ActorError> {
    Ok(self.evaluator.evaluate(expression)?)
  }
}
