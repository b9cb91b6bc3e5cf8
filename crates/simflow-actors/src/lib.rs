//! Simflow Actors
//!
//! The leaf actor library. Every actor here only depends on the contract in
//! `simflow-core`; the runtime treats them as opaque sources, transformers
//! and sinks.
//!
//! - sources: [`Start`], [`ForLoop`], [`StringConstants`], [`FileSupplier`],
//!   [`ListFiles`], [`GetStorageValue`], [`CombineStorage`]
//! - transformers: [`PassThrough`], [`Convert`], [`DeleteFile`],
//!   [`SetStorageValue`], [`DeleteStorageValue`], [`InitStorageValue`],
//!   [`UpdateStorageValue`], [`MathExpression`]
//! - sinks: [`Null`], [`Console`], [`DumpFile`]

pub mod conversion;
mod sinks;
mod sources;
mod transformers;

pub use sinks::{Console, DumpFile, Null};
pub use sources::{
  CombineStorage, FileSupplier, ForLoop, GetStorageValue, ListFiles, Start, StringConstants,
};
pub use transformers::{
  Convert, DeleteFile, DeleteStorageValue, InitStorageValue, MathExpression, PassThrough,
  SetStorageValue, UpdateStorageValue,
};

use regex::Regex;
use serde_json::Value;
use simflow_core::value::display_value;
use simflow_core::{ActorError, Options};

/// Configured option rendered for quick info; missing options render empty.
pub(crate) fn quick(options: &Options, name: &str) -> String {
  options.get(name).map(display_value).unwrap_or_default()
}

/// Compile a user pattern so that it only matches at the start of the text.
///
/// Returns `None` for the match-everything pattern `.*`.
pub(crate) fn start_anchored(option: &str, pattern: &str) -> Result<Option<Regex>, ActorError> {
  if pattern == ".*" {
    return Ok(None);
  }
  Regex::new(&format!("^(?:{})", pattern))
    .map(Some)
    .map_err(|e| ActorError::invalid_option(option, e.to_string()))
}

/// Interpret an option as a list.
pub(crate) fn as_list<'a>(option: &str, value: &'a Value) -> Result<&'a Vec<Value>, ActorError> {
  value
    .as_array()
    .ok_or_else(|| ActorError::invalid_option(option, format!("expected a list, got {}", value)))
}

#[cfg(test)]
pub(crate) mod testing {
  use serde_json::Value;
  use simflow_core::{Actor, ActorContext, ExpressionEvaluator, Options, Storage, normalize};
  use simflow_lua::LuaEvaluator;

  /// Normalized options plus the storage and evaluator a context borrows.
  pub struct Harness {
    pub options: Options,
    pub storage: Storage,
    pub evaluator: LuaEvaluator,
  }

  impl Harness {
    pub fn new<A: Actor>(actor: &mut A, raw: Options) -> Self {
      let options = normalize(&actor.options(), &raw).unwrap();
      actor.setup(&options).unwrap();
      Self {
        options,
        storage: Storage::new(),
        evaluator: LuaEvaluator::new().unwrap(),
      }
    }

    pub fn context(&mut self) -> ActorContext<'_> {
      let evaluator: &dyn ExpressionEvaluator = &self.evaluator;
      ActorContext::new("test.actor", &self.options, &mut self.storage, evaluator)
    }
  }

  /// Build options from `(key, value)` pairs.
  pub fn opts(pairs: &[(&str, Value)]) -> Options {
    pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.clone()))
      .collect()
  }
}
