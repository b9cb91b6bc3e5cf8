use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An option value as written in a flow definition.
///
/// Strings may contain `@{name}` storage placeholders, which are expanded
/// each time the actor resolves the option during a run.
pub type OptionValue = serde_json::Value;

/// Definition of a single actor in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDef {
  /// Registered actor type, e.g. "ForLoop" or "Trigger".
  #[serde(rename = "type")]
  pub actor_type: String,

  /// Optional name; defaults to the actor type.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,

  /// Option values keyed by option name.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub options: BTreeMap<String, OptionValue>,

  /// Child actors; only valid for container types (Trigger, Tee).
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub actors: Vec<ActorDef>,
}

impl ActorDef {
  /// Create a definition for the given actor type with no options.
  pub fn new(actor_type: impl Into<String>) -> Self {
    Self {
      actor_type: actor_type.into(),
      name: None,
      options: BTreeMap::new(),
      actors: Vec::new(),
    }
  }

  /// Set the actor name.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Set an option value.
  pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
    self.options.insert(key.into(), value.into());
    self
  }

  /// Append a child actor.
  pub fn child(mut self, child: ActorDef) -> Self {
    self.actors.push(child);
    self
  }
}
