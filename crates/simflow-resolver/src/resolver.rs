use simflow_config::{ActorDef, FlowDef};
use simflow_runtime::{ActorId, Flow, NAME_SEPARATOR};

use crate::error::ResolveError;
use crate::registry::ActorRegistry;

/// Resolver turns a FlowDef into an executable Flow.
pub trait Resolver {
  /// Resolve a flow definition.
  ///
  /// This process:
  /// 1. Looks up every actor type in the registry
  /// 2. Checks that only containers (Trigger, Tee) have children
  /// 3. Appends the actors in order, applying names and options
  fn resolve(&self, def: &FlowDef) -> Result<Flow, ResolveError>;
}

/// Standard resolver implementation that uses an actor registry.
pub struct StandardResolver<R: ActorRegistry> {
  registry: R,
}

impl<R: ActorRegistry> StandardResolver<R> {
  /// Create a new resolver with the given actor registry.
  pub fn new(registry: R) -> Self {
    Self { registry }
  }

  fn resolve_actor(
    &self,
    flow: &mut Flow,
    parent: ActorId,
    def: &ActorDef,
  ) -> Result<ActorId, ResolveError> {
    let path = || {
      let parent_name = flow.full_name(parent).unwrap_or_default();
      let name = def.name.as_deref().unwrap_or(&def.actor_type);
      format!("{}{}{}", parent_name, NAME_SEPARATOR, name)
    };

    let unit = self
      .registry
      .create(&def.actor_type)
      .ok_or_else(|| ResolveError::UnknownActorType {
        actor_type: def.actor_type.clone(),
        path: path(),
      })?;

    if !def.actors.is_empty() && !unit.accepts_children() {
      return Err(ResolveError::ChildrenNotAllowed {
        actor_type: def.actor_type.clone(),
        path: path(),
      });
    }

    let id = flow.append(parent, unit)?;
    if let Some(name) = &def.name {
      flow.set_name(id, name.as_str())?;
    }
    for (key, value) in &def.options {
      flow.set_option(id, key.as_str(), value.clone())?;
    }

    for child in &def.actors {
      self.resolve_actor(flow, id, child)?;
    }

    Ok(id)
  }
}

impl<R: ActorRegistry> Resolver for StandardResolver<R> {
  fn resolve(&self, def: &FlowDef) -> Result<Flow, ResolveError> {
    let mut flow = Flow::new(def.name.as_str());
    let root = flow.root();
    for actor in &def.actors {
      self.resolve_actor(&mut flow, root, actor)?;
    }
    Ok(flow)
  }
}
