//! The actor tree.
//!
//! A [`Flow`] is an arena of actors addressed by [`ActorId`]. The root
//! (id 0) is always a Sequence named after the flow; parent links are ids,
//! so the tree owns every actor exactly once and full names are computed by
//! walking up the parent chain.

use std::fmt;

use serde_json::Value;
use simflow_core::{
  ActorError, InputSink, OptionSpec, Options, OutputSource, Transformer, generate_help,
  with_defaults,
};

use crate::control::Control;
use crate::error::FlowError;

/// Separator between names in an actor's full name.
pub const NAME_SEPARATOR: &str = ".";

/// Index of an actor inside its [`Flow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(usize);

impl ActorId {
  /// The root Sequence of every flow.
  pub const ROOT: ActorId = ActorId(0);
}

impl fmt::Display for ActorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// An actor as stored in the tree, tagged with its role.
pub enum Unit {
  Source(Box<dyn OutputSource>),
  Transformer(Box<dyn Transformer>),
  Sink(Box<dyn InputSink>),
  Control(Control),
}

impl Unit {
  pub fn source<A: OutputSource + 'static>(actor: A) -> Self {
    Unit::Source(Box::new(actor))
  }

  pub fn transformer<A: Transformer + 'static>(actor: A) -> Self {
    Unit::Transformer(Box::new(actor))
  }

  pub fn sink<A: InputSink + 'static>(actor: A) -> Self {
    Unit::Sink(Box::new(actor))
  }

  pub fn trigger() -> Self {
    Unit::Control(Control::Trigger)
  }

  pub fn tee() -> Self {
    Unit::Control(Control::Tee)
  }

  pub fn stop() -> Self {
    Unit::Control(Control::Stop)
  }

  pub fn type_name(&self) -> &'static str {
    match self {
      Unit::Source(actor) => actor.type_name(),
      Unit::Transformer(actor) => actor.type_name(),
      Unit::Sink(actor) => actor.type_name(),
      Unit::Control(control) => control.type_name(),
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      Unit::Source(actor) => actor.description(),
      Unit::Transformer(actor) => actor.description(),
      Unit::Sink(actor) => actor.description(),
      Unit::Control(control) => control.description(),
    }
  }

  pub fn options(&self) -> Vec<OptionSpec> {
    match self {
      Unit::Source(actor) => actor.options(),
      Unit::Transformer(actor) => actor.options(),
      Unit::Sink(actor) => actor.options(),
      Unit::Control(control) => control.options(),
    }
  }

  pub fn quickinfo(&self, options: &Options) -> Option<String> {
    match self {
      Unit::Source(actor) => actor.quickinfo(options),
      Unit::Transformer(actor) => actor.quickinfo(options),
      Unit::Sink(actor) => actor.quickinfo(options),
      Unit::Control(control) => control.quickinfo(options),
    }
  }

  pub fn setup(&mut self, options: &Options) -> Result<(), ActorError> {
    match self {
      Unit::Source(actor) => actor.setup(options),
      Unit::Transformer(actor) => actor.setup(options),
      Unit::Sink(actor) => actor.setup(options),
      Unit::Control(_) => Ok(()),
    }
  }

  pub fn wrapup(&mut self) -> Result<(), ActorError> {
    match self {
      Unit::Source(actor) => actor.wrapup(),
      Unit::Transformer(actor) => actor.wrapup(),
      Unit::Sink(actor) => actor.wrapup(),
      Unit::Control(_) => Ok(()),
    }
  }

  /// The control kind, for control actors.
  pub fn control(&self) -> Option<Control> {
    match self {
      Unit::Control(control) => Some(*control),
      _ => None,
    }
  }

  pub fn is_source(&self) -> bool {
    matches!(self, Unit::Source(_))
  }

  pub fn accepts_children(&self) -> bool {
    self.control().is_some_and(Control::accepts_children)
  }

  /// Formatted help for this actor type.
  pub fn help(&self) -> String {
    generate_help(self.type_name(), self.description(), &self.options())
  }
}

impl fmt::Debug for Unit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let role = match self {
      Unit::Source(_) => "Source",
      Unit::Transformer(_) => "Transformer",
      Unit::Sink(_) => "Sink",
      Unit::Control(_) => "Control",
    };
    f.debug_tuple(role).field(&self.type_name()).finish()
  }
}

#[derive(Debug)]
pub(crate) struct Slot {
  pub(crate) name: String,
  pub(crate) parent: Option<ActorId>,
  pub(crate) children: Vec<ActorId>,
  pub(crate) unit: Unit,
  /// Options as set by the user.
  pub(crate) options: Options,
  /// Options after normalization, refreshed at the start of every run.
  pub(crate) normalized: Options,
  /// Cached full name, refreshed at the start of every run.
  pub(crate) full_name: String,
}

/// A tree of actors rooted in a Sequence.
#[derive(Debug)]
pub struct Flow {
  slots: Vec<Slot>,
}

impl Flow {
  /// Create a flow whose root Sequence carries `name`.
  pub fn new(name: impl Into<String>) -> Self {
    let name = name.into();
    Self {
      slots: vec![Slot {
        full_name: name.clone(),
        name,
        parent: None,
        children: Vec::new(),
        unit: Unit::Control(Control::Sequence),
        options: Options::new(),
        normalized: Options::new(),
      }],
    }
  }

  pub fn root(&self) -> ActorId {
    ActorId::ROOT
  }

  /// Number of actors including the root.
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  /// Append an actor as the last child of `parent`.
  ///
  /// The actor is named after its type; when a sibling already uses that
  /// name a numeric suffix is added.
  pub fn append(&mut self, parent: ActorId, unit: Unit) -> Result<ActorId, FlowError> {
    let parent_slot = self.slot(parent)?;
    if !parent_slot.unit.accepts_children() {
      return Err(FlowError::Structure {
        actor: self.full_name(parent)?,
        message: format!("{} cannot have children", parent_slot.unit.type_name()),
      });
    }
    if unit.control() == Some(Control::Sequence) {
      return Err(FlowError::Structure {
        actor: self.full_name(parent)?,
        message: "a Sequence can only be the root of a flow".to_string(),
      });
    }

    let name = self.unique_child_name(parent, unit.type_name());
    let id = ActorId(self.slots.len());
    self.slots.push(Slot {
      name,
      parent: Some(parent),
      children: Vec::new(),
      unit,
      options: Options::new(),
      normalized: Options::new(),
      full_name: String::new(),
    });
    self.slots[parent.0].children.push(id);
    Ok(id)
  }

  fn unique_child_name(&self, parent: ActorId, base: &str) -> String {
    let taken = |name: &str| {
      self.slots[parent.0]
        .children
        .iter()
        .any(|child| self.slots[child.0].name == name)
    };
    if !taken(base) {
      return base.to_string();
    }
    (1..)
      .map(|n| format!("{}-{}", base, n))
      .find(|candidate| !taken(candidate.as_str()))
      .unwrap_or_else(|| base.to_string())
  }

  /// Rename an actor. Names must stay unique among siblings.
  pub fn set_name(&mut self, id: ActorId, name: impl Into<String>) -> Result<(), FlowError> {
    let name = name.into();
    if let Some(parent) = self.slot(id)?.parent {
      let clash = self.slots[parent.0]
        .children
        .iter()
        .any(|&child| child != id && self.slots[child.0].name == name);
      if clash {
        return Err(FlowError::Structure {
          actor: self.full_name(parent)?,
          message: format!("name '{}' is already used by a sibling", name),
        });
      }
    }
    self.slot_mut(id)?.name = name;
    Ok(())
  }

  /// Set one raw option value.
  pub fn set_option(
    &mut self,
    id: ActorId,
    key: impl Into<String>,
    value: impl Into<Value>,
  ) -> Result<(), FlowError> {
    self.slot_mut(id)?.options.insert(key.into(), value.into());
    Ok(())
  }

  pub fn name(&self, id: ActorId) -> Result<&str, FlowError> {
    Ok(&self.slot(id)?.name)
  }

  /// Names from the root down to `id`, joined with [`NAME_SEPARATOR`].
  pub fn full_name(&self, id: ActorId) -> Result<String, FlowError> {
    let mut names = Vec::new();
    let mut current = Some(id);
    while let Some(id) = current {
      let slot = self.slot(id)?;
      names.push(slot.name.as_str());
      current = slot.parent;
    }
    names.reverse();
    Ok(names.join(NAME_SEPARATOR))
  }

  pub fn parent(&self, id: ActorId) -> Result<Option<ActorId>, FlowError> {
    Ok(self.slot(id)?.parent)
  }

  pub fn children(&self, id: ActorId) -> Result<&[ActorId], FlowError> {
    Ok(&self.slot(id)?.children)
  }

  pub fn unit(&self, id: ActorId) -> Result<&Unit, FlowError> {
    Ok(&self.slot(id)?.unit)
  }

  /// Formatted help for the actor's type.
  pub fn help(&self, id: ActorId) -> Result<String, FlowError> {
    Ok(self.slot(id)?.unit.help())
  }

  /// One line per actor, indented two spaces per level, with the name, type
  /// and quick info (options filled with their defaults).
  pub fn tree(&self) -> String {
    let mut out = String::new();
    for (id, depth) in self.walk() {
      let slot = &self.slots[id.0];
      let options = with_defaults(&slot.unit.options(), &slot.options);

      out.push_str(&"  ".repeat(depth));
      out.push_str(&slot.name);
      out.push_str(" (");
      out.push_str(slot.unit.type_name());
      out.push(')');
      if let Some(info) = slot.unit.quickinfo(&options) {
        out.push_str(" [");
        out.push_str(&info);
        out.push(']');
      }
      out.push('\n');
    }
    out
  }

  /// Every actor in depth-first pre-order with its depth.
  pub(crate) fn walk(&self) -> Vec<(ActorId, usize)> {
    let mut order = Vec::with_capacity(self.slots.len());
    let mut stack = vec![(ActorId::ROOT, 0)];
    while let Some((id, depth)) = stack.pop() {
      order.push((id, depth));
      for &child in self.slots[id.0].children.iter().rev() {
        stack.push((child, depth + 1));
      }
    }
    order
  }

  pub(crate) fn slot(&self, id: ActorId) -> Result<&Slot, FlowError> {
    self.slots.get(id.0).ok_or(FlowError::UnknownActor(id.0))
  }

  pub(crate) fn slot_mut(&mut self, id: ActorId) -> Result<&mut Slot, FlowError> {
    self.slots.get_mut(id.0).ok_or(FlowError::UnknownActor(id.0))
  }
}
