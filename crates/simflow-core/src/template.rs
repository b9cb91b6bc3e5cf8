//! Placeholder handling for option strings.
//!
//! Two independent placeholders exist:
//! - `@{name}`: replaced by the string form of storage item `name`
//! - `{X}`: in expression-bearing options, replaced by the current value
//!   (a token payload or a storage value, depending on the actor)
//!
//! `{X}` substitution never touches the `{X}` inside `@{X}`, so a storage item
//! literally called `X` still expands normally.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::StorageError;

/// Placeholder for the current value in expression options.
pub const CURRENT_VALUE: &str = "{X}";

static STORAGE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"@\{([^{}]+)\}").expect("storage placeholder pattern is valid")
});

/// Expand every `@{name}` in `text` in a single left-to-right pass.
///
/// Replacement text is never scanned again, so values that themselves
/// contain `@{...}` are inserted verbatim.
pub fn expand_with<F>(text: &str, mut lookup: F) -> Result<String, StorageError>
where
  F: FnMut(&str) -> Option<String>,
{
  let mut expanded = String::with_capacity(text.len());
  let mut last = 0;

  for caps in STORAGE_PLACEHOLDER.captures_iter(text) {
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    let value = lookup(name.as_str()).ok_or_else(|| StorageError::MissingKey {
      name: name.as_str().to_string(),
    })?;
    expanded.push_str(&text[last..whole.start()]);
    expanded.push_str(&value);
    last = whole.end();
  }

  expanded.push_str(&text[last..]);
  Ok(expanded)
}

/// Replace every `{X}` that is not part of an `@{X}` storage placeholder.
pub fn substitute_current(expression: &str, current: &str) -> String {
  let mut result = String::with_capacity(expression.len());
  let mut last = 0;

  for (index, _) in expression.match_indices(CURRENT_VALUE) {
    if index > 0 && expression.as_bytes()[index - 1] == b'@' {
      continue;
    }
    result.push_str(&expression[last..index]);
    result.push_str(current);
    last = index + CURRENT_VALUE.len();
  }

  result.push_str(&expression[last..]);
  result
}
