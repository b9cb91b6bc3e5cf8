//! Simflow Runtime
//!
//! This crate owns the actor tree and executes it:
//!
//! - [`Flow`]: the arena of actors, addressed by [`ActorId`]
//! - [`Unit`]: an actor tagged with its role (source, transformer, sink or
//!   one of the [`Control`] actors)
//! - [`Runtime`]: the driver that sets up, drives and wraps up a flow
//!
//! Leaf actors come from `simflow-actors` or any crate implementing the
//! `simflow-core` traits.

mod control;
mod error;
mod flow;
mod result;
mod runtime;

pub use control::Control;
pub use error::FlowError;
pub use flow::{ActorId, Flow, NAME_SEPARATOR, Unit};
pub use result::{RunOptions, RunOutcome};
pub use runtime::Runtime;
