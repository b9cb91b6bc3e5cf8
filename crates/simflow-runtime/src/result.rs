//! Run options and results.

use simflow_core::Storage;

/// Switches for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
  /// Print the actor tree to stdout before executing.
  pub print_tree: bool,
  /// Clear storage once the run is over.
  pub cleanup: bool,
  /// Call `wrapup` on every actor after a Stop.
  pub wrapup_on_stop: bool,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      print_tree: false,
      cleanup: true,
      wrapup_on_stop: true,
    }
  }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct RunOutcome {
  /// Unique id of this run, as used in log records.
  pub run_id: String,
  /// Whether a Stop actor ended the run.
  pub stopped: bool,
  /// Final storage; empty when `cleanup` was set.
  pub storage: Storage,
}
