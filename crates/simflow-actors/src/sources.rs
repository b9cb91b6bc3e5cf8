//! Actors that produce tokens without consuming any.

use std::path::Path;

use serde_json::{Value, json};
use simflow_core::value::as_i64;
use simflow_core::{Actor, ActorContext, ActorError, OptionSpec, Options, OutputSource, Token};
use walkdir::WalkDir;

use crate::{as_list, quick, start_anchored};

/// Emits a single null token.
#[derive(Debug, Default)]
pub struct Start;

impl Actor for Start {
  fn type_name(&self) -> &'static str {
    "Start"
  }

  fn description(&self) -> &'static str {
    "Outputs a null token for triggering other actors."
  }
}

impl OutputSource for Start {
  fn emit(&mut self, _cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
    Ok(vec![Token::start()])
  }
}

/// Emits the integers from `min` to `max` inclusive.
#[derive(Debug, Default)]
pub struct ForLoop;

impl Actor for ForLoop {
  fn type_name(&self) -> &'static str {
    "ForLoop"
  }

  fn description(&self) -> &'static str {
    "Outputs integers using the specified min, max and step."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![
      OptionSpec::new("min", 1, "The minimum for the loop (included, int)."),
      OptionSpec::new("max", 10, "The maximum for the loop (included, int)."),
      OptionSpec::new("step", 1, "The step size (positive int)."),
    ]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!(
      "min: {}, max: {}, step: {}",
      quick(options, "min"),
      quick(options, "max"),
      quick(options, "step")
    ))
  }

  fn setup(&mut self, options: &Options) -> Result<(), ActorError> {
    // templated steps are checked when the loop runs
    if let Some(step) = options.get("step").and_then(as_i64) {
      check_step(step)?;
    }
    Ok(())
  }
}

fn check_step(step: i64) -> Result<(), ActorError> {
  if step <= 0 {
    return Err(ActorError::invalid_option(
      "step",
      format!("must be positive, got {}", step),
    ));
  }
  Ok(())
}

impl OutputSource for ForLoop {
  fn emit(&mut self, cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
    let min = cx.resolve_i64("min")?;
    let max = cx.resolve_i64("max")?;
    let step = cx.resolve_i64("step")?;
    check_step(step)?;

    Ok((min..=max).step_by(step as usize).map(Token::new).collect())
  }
}

/// Emits each configured string.
#[derive(Debug, Default)]
pub struct StringConstants;

impl Actor for StringConstants {
  fn type_name(&self) -> &'static str {
    "StringConstants"
  }

  fn description(&self) -> &'static str {
    "Outputs a fixed list of strings."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![OptionSpec::new(
      "strings",
      json!([]),
      "The strings to output (list of string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    let count = options.get("strings").and_then(Value::as_array).map_or(0, Vec::len);
    Some(format!("strings: {}", count))
  }
}

impl OutputSource for StringConstants {
  fn emit(&mut self, cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
    let strings = as_list("strings", cx.option("strings")?)?;
    Ok(strings.iter().cloned().map(Token::new).collect())
  }
}

/// Emits each configured file name.
#[derive(Debug, Default)]
pub struct FileSupplier;

impl Actor for FileSupplier {
  fn type_name(&self) -> &'static str {
    "FileSupplier"
  }

  fn description(&self) -> &'static str {
    "Outputs a fixed list of files."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![OptionSpec::new(
      "files",
      json!([]),
      "The files to output (list of string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    let count = options.get("files").and_then(Value::as_array).map_or(0, Vec::len);
    Some(format!("files: {}", count))
  }
}

impl OutputSource for FileSupplier {
  fn emit(&mut self, cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
    let files = as_list("files", cx.option("files")?)?;
    Ok(files.iter().cloned().map(Token::new).collect())
  }
}

/// Lists the entries of a directory whose names match a pattern.
#[derive(Debug, Default)]
pub struct ListFiles;

impl Actor for ListFiles {
  fn type_name(&self) -> &'static str {
    "ListFiles"
  }

  fn description(&self) -> &'static str {
    "Source that list files in a directory."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![
      OptionSpec::new("dir", ".", "The directory to search (string)."),
      OptionSpec::new("recursive", false, "Whether to search recursively (bool)."),
      OptionSpec::new("list_files", true, "Whether to include files (bool)."),
      OptionSpec::new("list_dirs", false, "Whether to include directories (bool)."),
      OptionSpec::new(
        "regexp",
        ".*",
        "The regular expression that files/dirs must match (string).",
      ),
    ]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!(
      "dir: {}, files: {}, dirs: {}, recursive: {}",
      quick(options, "dir"),
      quick(options, "list_files"),
      quick(options, "list_dirs"),
      quick(options, "recursive")
    ))
  }
}

impl OutputSource for ListFiles {
  fn emit(&mut self, cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
    let dir = cx.resolve_string("dir")?;
    let recursive = cx.resolve_bool("recursive")?;
    let list_files = cx.resolve_bool("list_files")?;
    let list_dirs = cx.resolve_bool("list_dirs")?;
    let pattern = start_anchored("regexp", &cx.resolve_string("regexp")?)?;

    let root = Path::new(&dir);
    if !root.exists() {
      return Err(ActorError::failed(format!("directory '{}' does not exist", dir)));
    }
    if !root.is_dir() {
      return Err(ActorError::failed(format!("location '{}' is not a directory", dir)));
    }

    let walker = WalkDir::new(root)
      .min_depth(1)
      .max_depth(if recursive { usize::MAX } else { 1 })
      .sort_by_file_name();

    let mut tokens = Vec::new();
    for entry in walker {
      let entry = entry.map_err(|e| ActorError::failed(format!("error listing '{}': {}", dir, e)))?;
      let file_type = entry.file_type();
      let wanted = (list_files && file_type.is_file()) || (list_dirs && file_type.is_dir());
      if !wanted {
        continue;
      }
      let name = entry.file_name().to_string_lossy();
      if pattern.as_ref().is_none_or(|re| re.is_match(&name)) {
        tokens.push(Token::new(entry.path().display().to_string()));
      }
    }

    Ok(tokens)
  }
}

/// Emits the value stored under `storage_name`.
#[derive(Debug, Default)]
pub struct GetStorageValue;

impl Actor for GetStorageValue {
  fn type_name(&self) -> &'static str {
    "GetStorageValue"
  }

  fn description(&self) -> &'static str {
    "Outputs the specified value from storage."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![OptionSpec::new(
      "storage_name",
      "unknown",
      "The name of the storage value to retrieve (string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("name: {}", quick(options, "storage_name")))
  }
}

impl OutputSource for GetStorageValue {
  fn emit(&mut self, cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
    let name = cx.resolve_string("storage_name")?;
    let value = cx.storage().require(&name)?.clone();
    Ok(vec![Token::new(value)])
  }
}

/// Emits the `format` string with storage items expanded.
#[derive(Debug, Default)]
pub struct CombineStorage;

impl Actor for CombineStorage {
  fn type_name(&self) -> &'static str {
    "CombineStorage"
  }

  fn description(&self) -> &'static str {
    "Expands the storage items specified in format string and forwards the generated string."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![OptionSpec::new(
      "format",
      "",
      "The format to use for generating the combined string; use '@{blah}' for accessing storage item 'blah' (string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("format: {}", quick(options, "format")))
  }
}

impl OutputSource for CombineStorage {
  fn emit(&mut self, cx: &mut ActorContext<'_>) -> Result<Vec<Token>, ActorError> {
    Ok(vec![Token::new(cx.resolve_string("format")?)])
  }
}
