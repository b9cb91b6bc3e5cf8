//! Actor registries map type names to factories.

use std::collections::BTreeMap;

use simflow_actors::{
  CombineStorage, Console, Convert, DeleteFile, DeleteStorageValue, DumpFile, FileSupplier,
  ForLoop, GetStorageValue, InitStorageValue, ListFiles, MathExpression, Null, PassThrough,
  SetStorageValue, Start, StringConstants, UpdateStorageValue,
};
use simflow_runtime::Unit;

/// Creates a fresh actor instance.
pub type ActorFactory = fn() -> Unit;

/// Lookup of actor types by name.
pub trait ActorRegistry {
  /// Create a new instance of the named actor type.
  fn create(&self, actor_type: &str) -> Option<Unit>;

  /// All registered type names, sorted.
  fn type_names(&self) -> Vec<&str>;
}

/// Registry backed by an in-memory map of factories.
#[derive(Debug, Clone, Default)]
pub struct StandardRegistry {
  factories: BTreeMap<String, ActorFactory>,
}

impl StandardRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with every actor from `simflow-actors` plus Trigger, Tee and Stop.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();

    registry.register("Trigger", Unit::trigger);
    registry.register("Tee", Unit::tee);
    registry.register("Stop", Unit::stop);

    registry.register("Start", || Unit::source(Start));
    registry.register("ForLoop", || Unit::source(ForLoop));
    registry.register("StringConstants", || Unit::source(StringConstants));
    registry.register("FileSupplier", || Unit::source(FileSupplier));
    registry.register("ListFiles", || Unit::source(ListFiles));
    registry.register("GetStorageValue", || Unit::source(GetStorageValue));
    registry.register("CombineStorage", || Unit::source(CombineStorage));

    registry.register("PassThrough", || Unit::transformer(PassThrough::default()));
    registry.register("Convert", || Unit::transformer(Convert::default()));
    registry.register("DeleteFile", || Unit::transformer(DeleteFile::default()));
    registry.register("SetStorageValue", || {
      Unit::transformer(SetStorageValue::default())
    });
    registry.register("DeleteStorageValue", || {
      Unit::transformer(DeleteStorageValue::default())
    });
    registry.register("InitStorageValue", || {
      Unit::transformer(InitStorageValue::default())
    });
    registry.register("UpdateStorageValue", || {
      Unit::transformer(UpdateStorageValue::default())
    });
    registry.register("MathExpression", || {
      Unit::transformer(MathExpression::default())
    });

    registry.register("Null", || Unit::sink(Null));
    registry.register("Console", || Unit::sink(Console::new()));
    registry.register("DumpFile", || Unit::sink(DumpFile::default()));

    registry
  }

  /// Register a factory, replacing any previous one for the same name.
  pub fn register(&mut self, actor_type: impl Into<String>, factory: ActorFactory) {
    self.factories.insert(actor_type.into(), factory);
  }
}

impl ActorRegistry for StandardRegistry {
  fn create(&self, actor_type: &str) -> Option<Unit> {
    self.factories.get(actor_type).map(|factory| factory())
  }

  fn type_names(&self) -> Vec<&str> {
    self.factories.keys().map(String::as_str).collect()
  }
}
