//! Actors that consume one token and emit zero or more.
//!
//! Every transformer queues its outputs in an [`Outbox`] during `accept`;
//! `emit` hands them to the runtime.

use std::fs;

use serde_json::Value;
use simflow_core::template::substitute_current;
use simflow_core::value::display_value;
use simflow_core::{
  Actor, ActorContext, ActorError, InputSink, OptionSpec, Options, Outbox, OutputSource, Token,
};

use crate::conversion::{self, Conversion};
use crate::{quick, start_anchored};

/// Emit the queued outputs and implement the `OutputSource` half.
macro_rules! drains_outbox {
  ($actor:ty) => {
    impl OutputSource for $actor {
      fn emit(&mut self, _cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
        Ok(self.outbox.drain())
      }
    }
  };
}

/// Forwards every token unchanged.
#[derive(Debug, Default)]
pub struct PassThrough {
  outbox: Outbox,
}

impl Actor for PassThrough {
  fn type_name(&self) -> &'static str {
    "PassThrough"
  }

  fn description(&self) -> &'static str {
    "Dummy actor that just passes through the data."
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for PassThrough {
  fn accept(&mut self, token: Token, _cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    self.outbox.push(token);
    Ok(())
  }
}

drains_outbox!(PassThrough);

/// Applies a [`Conversion`] to every payload.
#[derive(Debug)]
pub struct Convert {
  conversion: Box<dyn Conversion>,
  outbox: Outbox,
}

impl Default for Convert {
  fn default() -> Self {
    Self {
      conversion: Box::new(conversion::PassThrough),
      outbox: Outbox::new(),
    }
  }
}

impl Convert {
  fn option_in_use(options: &Options) -> &'static str {
    match options.get("setup") {
      Some(value) if !value.is_null() => "setup",
      _ => "conversion",
    }
  }
}

impl Actor for Convert {
  fn type_name(&self) -> &'static str {
    "Convert"
  }

  fn description(&self) -> &'static str {
    "Converts the input data with the given conversion setup."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![
      OptionSpec::new(
        "conversion",
        "PassThrough",
        "The conversion to apply to the input data; a name or an object with a 'type' (Conversion).",
      ),
      OptionSpec::new(
        "setup",
        Value::Null,
        "Older name of 'conversion'; used instead of it when set (Conversion).",
      ),
    ]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("conversion: {}", quick(options, Convert::option_in_use(options))))
  }

  fn setup(&mut self, options: &Options) -> Result<(), ActorError> {
    if let Some(value) = options.get(Convert::option_in_use(options)) {
      self.conversion = conversion::from_value(value)?;
    }
    Ok(())
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for Convert {
  fn check_input(&self, token: &Token) -> Result<(), ActorError> {
    self.conversion.check_input(token.payload())
  }

  fn accept(&mut self, token: Token, _cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    if let Some(converted) = self.conversion.convert(token.into_payload())? {
      self.outbox.push(Token::new(converted));
    }
    Ok(())
  }
}

drains_outbox!(Convert);

/// Deletes the incoming file names that match `regexp`, forwarding every token.
#[derive(Debug, Default)]
pub struct DeleteFile {
  outbox: Outbox,
}

impl Actor for DeleteFile {
  fn type_name(&self) -> &'static str {
    "DeleteFile"
  }

  fn description(&self) -> &'static str {
    "Deletes the incoming files that match the regular expression."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![OptionSpec::new(
      "regexp",
      ".*",
      "The regular expression that the files must match (string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("regexp: {}", quick(options, "regexp")))
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for DeleteFile {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    let path = display_value(token.payload());
    let pattern = start_anchored("regexp", &cx.resolve_string("regexp")?)?;

    if pattern.as_ref().is_none_or(|re| re.is_match(&path)) {
      fs::remove_file(&path).map_err(|e| ActorError::io(format!("failed to delete '{}'", path), e))?;
    }

    self.outbox.push(token);
    Ok(())
  }
}

drains_outbox!(DeleteFile);

fn storage_name_option(help: &'static str) -> OptionSpec {
  OptionSpec::new("storage_name", "unknown", help)
}

/// Stores the payload under `storage_name` and forwards the token.
#[derive(Debug, Default)]
pub struct SetStorageValue {
  outbox: Outbox,
}

impl Actor for SetStorageValue {
  fn type_name(&self) -> &'static str {
    "SetStorageValue"
  }

  fn description(&self) -> &'static str {
    "Store the payload of the current token in internal storage using the specified name."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![storage_name_option(
      "The storage value name for storing the payload under (string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("name: {}", quick(options, "storage_name")))
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for SetStorageValue {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    let name = cx.resolve_string("storage_name")?;
    cx.storage_mut().set(name, token.payload().clone());
    self.outbox.push(token);
    Ok(())
  }
}

drains_outbox!(SetStorageValue);

/// Removes `storage_name` from storage and forwards the token.
#[derive(Debug, Default)]
pub struct DeleteStorageValue {
  outbox: Outbox,
}

impl Actor for DeleteStorageValue {
  fn type_name(&self) -> &'static str {
    "DeleteStorageValue"
  }

  fn description(&self) -> &'static str {
    "Deletes the specified value from internal storage."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![storage_name_option(
      "The name of the storage value to delete (string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("name: {}", quick(options, "storage_name")))
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for DeleteStorageValue {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    let name = cx.resolve_string("storage_name")?;
    cx.storage_mut().delete(&name);
    self.outbox.push(token);
    Ok(())
  }
}

drains_outbox!(DeleteStorageValue);

/// Stores an initial value; string values are evaluated as expressions.
#[derive(Debug, Default)]
pub struct InitStorageValue {
  outbox: Outbox,
}

impl Actor for InitStorageValue {
  fn type_name(&self) -> &'static str {
    "InitStorageValue"
  }

  fn description(&self) -> &'static str {
    "Initializes the storage value with the provided value; strings are evaluated as expressions."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![
      storage_name_option("The name of the storage value to initialize (string)."),
      OptionSpec::new("value", "1", "The initial value (expression string or literal)."),
    ]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!(
      "name: {}, value: {}",
      quick(options, "storage_name"),
      quick(options, "value")
    ))
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for InitStorageValue {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    let name = cx.resolve_string("storage_name")?;
    let value = match cx.resolve("value")? {
      Value::String(expression) => cx.evaluate(&expression)?,
      literal => literal,
    };
    cx.storage_mut().set(name, value);
    self.outbox.push(token);
    Ok(())
  }
}

drains_outbox!(InitStorageValue);

/// Replaces a stored value with the result of `expression`, where `{X}` is
/// the value currently stored.
#[derive(Debug, Default)]
pub struct UpdateStorageValue {
  outbox: Outbox,
}

impl Actor for UpdateStorageValue {
  fn type_name(&self) -> &'static str {
    "UpdateStorageValue"
  }

  fn description(&self) -> &'static str {
    "Updates the specified storage value using the expression.\n\
     The current value is available through the variable {X} in the expression.\n\
     Any storage value can be referenced using @{name} with 'name' being the name of the storage value."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![
      storage_name_option("The name of the storage value to update (string)."),
      OptionSpec::new(
        "expression",
        "int({X} + 1)",
        "The expression for updating the storage value; use {X} for current value (string).",
      ),
    ]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!(
      "name: {}, expression: {}",
      quick(options, "storage_name"),
      quick(options, "expression")
    ))
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for UpdateStorageValue {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    let name = cx.resolve_string("storage_name")?;
    let current = display_value(cx.storage().require(&name)?);
    let expression = cx.expand(&display_value(cx.option("expression")?))?;
    let expression = substitute_current(&expression, &current);

    let updated = cx.evaluate(&expression)?;
    cx.storage_mut().set(name, updated);
    self.outbox.push(token);
    Ok(())
  }
}

drains_outbox!(UpdateStorageValue);

/// Evaluates `expression` with `{X}` bound to the payload and emits the result.
#[derive(Debug, Default)]
pub struct MathExpression {
  outbox: Outbox,
}

impl Actor for MathExpression {
  fn type_name(&self) -> &'static str {
    "MathExpression"
  }

  fn description(&self) -> &'static str {
    "Calculates a mathematical expression. The placeholder {X} in the expression gets replaced by \
     the value of the current token passing through. Mathematical functions are available through \
     the 'math' library, e.g., '1 + math.sin({X})'."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![OptionSpec::new(
      "expression",
      "{X}",
      "The mathematical expression to evaluate (string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("expression: {}", quick(options, "expression")))
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.outbox.clear();
    Ok(())
  }
}

impl InputSink for MathExpression {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    let expression = cx.resolve_string("expression")?;
    let expression = substitute_current(&expression, &display_value(token.payload()));
    let result = cx.evaluate(&expression)?;
    self.outbox.push(Token::new(result));
    Ok(())
  }
}

drains_outbox!(MathExpression);
