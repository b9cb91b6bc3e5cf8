use serde_json::Value;

use crate::error::ExpressionError;

/// Capability for evaluating arithmetic and boolean expressions.
///
/// Placeholders (`{X}`, `@{name}`) are substituted by the caller before the
/// expression reaches the evaluator.
pub trait ExpressionEvaluator: Send {
  /// Evaluate an expression to a value.
  fn evaluate(&self, expression: &str) -> Result<Value, ExpressionError>;

  /// Evaluate an expression that must produce a boolean.
  fn evaluate_bool(&self, expression: &str) -> Result<bool, ExpressionError> {
    match self.evaluate(expression)? {
      Value::Bool(b) => Ok(b),
      other => Err(ExpressionError::new(
        expression,
        format!("expected a boolean result, got {}", other),
      )),
    }
  }
}
