//! Simflow Config
//!
//! This crate contains the serializable flow configuration types for simflow.
//! These types describe an actor tree before it is resolved into an executable
//! flow by `simflow-resolver`.
//!
//! Configuration can be loaded from:
//! - JSON files (via CLI with `simflow run flow.json`)
//! - Any serde source that produces the same shape
//!
//! The resolver looks up every actor type in its registry, applies names and
//! options, and builds the arena-backed flow the runtime executes.

mod actor;
mod flow;

pub use actor::{ActorDef, OptionValue};
pub use flow::FlowDef;
