//! Error types shared by actors.

use thiserror::Error;

/// Errors raised by storage access and template expansion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
  /// A name was read (directly or through `@{name}`) that is not stored.
  #[error("no storage item called '{name}'")]
  MissingKey { name: String },
}

/// Failure to evaluate an expression.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to evaluate '{expression}': {message}")]
pub struct ExpressionError {
  pub expression: String,
  pub message: String,
}

impl ExpressionError {
  pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      expression: expression.into(),
      message: message.into(),
    }
  }
}

/// Errors raised while normalizing an actor's options against its schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
  #[error("missing required option '{name}'")]
  Missing { name: String },

  #[error("unknown option '{name}' (known options: {known})")]
  Unknown { name: String, known: String },
}

/// Errors an actor reports from any lifecycle step.
///
/// The runtime wraps these with the actor's full name before surfacing them.
#[derive(Debug, Error)]
pub enum ActorError {
  #[error(transparent)]
  Storage(#[from] StorageError),

  #[error(transparent)]
  Expression(#[from] ExpressionError),

  #[error(transparent)]
  Options(#[from] OptionsError),

  /// An option resolved to a value the actor cannot use.
  #[error("option '{name}': {message}")]
  InvalidOption { name: String, message: String },

  /// A transformer or sink was driven without a token.
  #[error("no input token provided")]
  MissingInput,

  /// The input token was rejected by `check_input`.
  #[error("unsupported input: {message}")]
  UnsupportedInput { message: String },

  #[error("{context}: {source}")]
  Io {
    context: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{message}")]
  Failed { message: String },
}

impl ActorError {
  pub fn invalid_option(name: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidOption {
      name: name.into(),
      message: message.into(),
    }
  }

  pub fn unsupported_input(message: impl Into<String>) -> Self {
    Self::UnsupportedInput {
      message: message.into(),
    }
  }

  pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
    Self::Io {
      context: context.into(),
      source,
    }
  }

  pub fn failed(message: impl Into<String>) -> Self {
    Self::Failed {
      message: message.into(),
    }
  }
}
