use simflow_runtime::FlowError;
use thiserror::Error;

/// Errors that can occur while resolving a flow definition.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// Actor type not found in the registry.
  #[error("unknown actor type '{actor_type}' at '{path}'")]
  UnknownActorType { actor_type: String, path: String },

  /// Children were given to an actor that cannot hold any.
  #[error("actor '{path}' of type '{actor_type}' cannot have children")]
  ChildrenNotAllowed { actor_type: String, path: String },

  /// The flow rejected the actor (name clash, invalid placement).
  #[error(transparent)]
  Flow(#[from] FlowError),
}
