//! Simflow Core
//!
//! This crate defines the pieces every actor shares, independent of how a
//! flow is traversed:
//!
//! - [`Token`]: the immutable single-value message passed between actors
//! - [`Storage`]: the run-scoped name → value store with `@{name}` expansion
//! - [`OptionSpec`] and [`normalize`]: declared option schemas with defaults
//! - [`Actor`], [`OutputSource`], [`InputSink`]: the lifecycle contract,
//!   split into narrow capabilities (a transformer implements both)
//! - [`ExpressionEvaluator`]: the injected expression capability
//!
//! The traversal itself (sequence, trigger, tee, stop) lives in
//! `simflow-runtime`.

mod actor;
mod context;
mod error;
mod expression;
mod help;
mod options;
mod storage;
pub mod template;
mod token;
pub mod value;

pub use actor::{Actor, InputSink, Outbox, OutputSource, Transformer};
pub use context::ActorContext;
pub use error::{ActorError, ExpressionError, OptionsError, StorageError};
pub use expression::ExpressionEvaluator;
pub use help::generate_help;
pub use options::{OptionSpec, Options, normalize, with_defaults};
pub use storage::Storage;
pub use token::Token;
