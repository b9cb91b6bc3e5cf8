//! Declared option schemas.
//!
//! Each actor publishes a list of [`OptionSpec`]s. Before a run the raw
//! options set on the actor are normalized once: missing keys receive their
//! default, keys already set are kept, and unknown keys are rejected.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::OptionsError;

/// Option values keyed by option name.
pub type Options = BTreeMap<String, Value>;

/// Schema entry for one actor option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
  pub name: &'static str,
  /// `None` marks a required option.
  pub default: Option<Value>,
  pub help: &'static str,
}

impl OptionSpec {
  /// An option with a default value.
  pub fn new(name: &'static str, default: impl Into<Value>, help: &'static str) -> Self {
    Self {
      name,
      default: Some(default.into()),
      help,
    }
  }

  /// An option that must be set explicitly.
  pub fn required(name: &'static str, help: &'static str) -> Self {
    Self {
      name,
      default: None,
      help,
    }
  }

  pub fn is_required(&self) -> bool {
    self.default.is_none()
  }
}

/// Normalize raw options against a schema.
///
/// Returns a new map; `raw` is left untouched.
pub fn normalize(specs: &[OptionSpec], raw: &Options) -> Result<Options, OptionsError> {
  if let Some(name) = raw.keys().find(|key| !specs.iter().any(|s| s.name == key.as_str())) {
    let known: Vec<&str> = specs.iter().map(|s| s.name).collect();
    return Err(OptionsError::Unknown {
      name: name.clone(),
      known: if known.is_empty() {
        "none".to_string()
      } else {
        known.join(", ")
      },
    });
  }

  let mut normalized = raw.clone();
  for spec in specs {
    if normalized.contains_key(spec.name) {
      continue;
    }
    match &spec.default {
      Some(default) => {
        normalized.insert(spec.name.to_string(), default.clone());
      }
      None => {
        return Err(OptionsError::Missing {
          name: spec.name.to_string(),
        });
      }
    }
  }

  Ok(normalized)
}

/// Fill defaults without validating; used for display.
pub fn with_defaults(specs: &[OptionSpec], raw: &Options) -> Options {
  let mut options = raw.clone();
  for spec in specs {
    if let Some(default) = &spec.default {
      options
        .entry(spec.name.to_string())
        .or_insert_with(|| default.clone());
    }
  }
  options
}
