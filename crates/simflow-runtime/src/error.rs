//! Runtime error types.

use simflow_core::ActorError;

/// Errors that abort building or running a flow.
///
/// Every variant names the actor it originated from by its full name.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
  /// Options could not be normalized against the actor's schema.
  #[error("invalid configuration for '{actor}': {source}")]
  Configuration {
    actor: String,
    #[source]
    source: ActorError,
  },

  /// The actor rejected its configuration during setup.
  #[error("setup failed for '{actor}': {source}")]
  Setup {
    actor: String,
    #[source]
    source: ActorError,
  },

  /// The actor failed while processing a token.
  #[error("execution failed in '{actor}': {source}")]
  Execution {
    actor: String,
    #[source]
    source: ActorError,
  },

  /// The tree shape is invalid (children in the wrong place, empty containers).
  #[error("invalid flow structure at '{actor}': {message}")]
  Structure { actor: String, message: String },

  /// An `ActorId` that does not belong to this flow.
  #[error("unknown actor id {0}")]
  UnknownActor(usize),
}

impl FlowError {
  /// Full name of the actor the error originated from, if any.
  pub fn actor(&self) -> Option<&str> {
    match self {
      FlowError::Configuration { actor, .. }
      | FlowError::Setup { actor, .. }
      | FlowError::Execution { actor, .. }
      | FlowError::Structure { actor, .. } => Some(actor),
      FlowError::UnknownActor(_) => None,
    }
  }
}
