//! The actor lifecycle contract.
//!
//! Every actor implements [`Actor`] (metadata, option schema, setup, wrapup)
//! plus one or both of the narrow execution capabilities:
//!
//! | role        | implements                       |
//! |-------------|----------------------------------|
//! | source      | [`OutputSource`]                 |
//! | sink        | [`InputSink`]                    |
//! | transformer | [`InputSink`] + [`OutputSource`] |
//!
//! A transformer's `accept` queues outputs in an [`Outbox`]; the runtime
//! calls `emit` right after to collect them.

use std::mem;

use crate::context::ActorContext;
use crate::error::ActorError;
use crate::options::{OptionSpec, Options};
use crate::token::Token;

/// Metadata and lifecycle shared by every actor.
pub trait Actor: Send {
  /// Type tag, also the default actor name.
  fn type_name(&self) -> &'static str;

  /// One-line description used by the help output.
  fn description(&self) -> &'static str;

  /// Declared options with defaults and help text.
  fn options(&self) -> Vec<OptionSpec> {
    Vec::new()
  }

  /// Short summary of the configured options for tree output.
  fn quickinfo(&self, _options: &Options) -> Option<String> {
    None
  }

  /// One-time validation against the normalized options, before a run.
  fn setup(&mut self, _options: &Options) -> Result<(), ActorError> {
    Ok(())
  }

  /// Release resources held between executions.
  fn wrapup(&mut self) -> Result<(), ActorError> {
    Ok(())
  }
}

/// Capability of producing tokens.
pub trait OutputSource: Actor {
  /// Produce the next batch of tokens, in emission order.
  fn emit(&mut self, cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError>;
}

/// Capability of consuming tokens.
pub trait InputSink: Actor {
  /// Reject tokens the actor cannot handle before `accept` runs.
  fn check_input(&self, _token: &Token) -> Result<(), ActorError> {
    Ok(())
  }

  /// Consume one token.
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError>;
}

/// An actor that both consumes and produces tokens.
pub trait Transformer: InputSink + OutputSource {}

impl<T: InputSink + OutputSource> Transformer for T {}

/// Pending outputs of a transformer between `accept` and `emit`.
#[derive(Debug, Default)]
pub struct Outbox {
  pending: Vec<Token>,
}

impl Outbox {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, token: Token) {
    self.pending.push(token);
  }

  /// Take every pending token, leaving the outbox empty.
  pub fn drain(&mut self) -> Vec<Token> {
    mem::take(&mut self.pending)
  }

  pub fn clear(&mut self) {
    self.pending.clear();
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }
}
