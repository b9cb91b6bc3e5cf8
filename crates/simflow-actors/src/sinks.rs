//! Actors that consume tokens and emit nothing.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};

use simflow_core::{Actor, ActorContext, ActorError, InputSink, OptionSpec, Options, Token};

use crate::quick;

/// Discards every token.
#[derive(Debug, Default)]
pub struct Null;

impl Actor for Null {
  fn type_name(&self) -> &'static str {
    "Null"
  }

  fn description(&self) -> &'static str {
    "Sink that just gobbles up all the data."
  }
}

impl InputSink for Null {
  fn accept(&mut self, _token: Token, _cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    Ok(())
  }
}

/// Writes `prefix` followed by the payload, one line per token.
pub struct Console {
  writer: Box<dyn Write + Send>,
}

impl Console {
  /// Console writing to stdout.
  pub fn new() -> Self {
    Self::with_writer(Box::new(io::stdout()))
  }

  pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
    Self { writer }
  }
}

impl Default for Console {
  fn default() -> Self {
    Self::new()
  }
}

impl Actor for Console {
  fn type_name(&self) -> &'static str {
    "Console"
  }

  fn description(&self) -> &'static str {
    "Sink that outputs the payloads of the data on stdout."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![OptionSpec::new(
      "prefix",
      "",
      "The prefix for the output (string).",
    )]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!("prefix: '{}'", quick(options, "prefix")))
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self
      .writer
      .flush()
      .map_err(|e| ActorError::io("failed to flush console", e))
  }
}

impl InputSink for Console {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    let prefix = cx.resolve_string("prefix")?;
    writeln!(self.writer, "{}{}", prefix, token)
      .map_err(|e| ActorError::io("failed to write to console", e))
  }
}

/// Writes one payload per line to `output`.
///
/// The file is opened when the first token arrives and closed in `wrapup`.
#[derive(Debug, Default)]
pub struct DumpFile {
  file: Option<BufWriter<File>>,
}

impl DumpFile {
  fn open(cx: &ActorContext<'_>) -> Result<BufWriter<File>, ActorError> {
    let output = cx.resolve_string("output")?;
    let append = cx.resolve_bool("append")?;

    let mut open_options = OpenOptions::new();
    open_options.create(true);
    if append {
      open_options.append(true);
    } else {
      open_options.write(true).truncate(true);
    }

    let file = open_options
      .open(&output)
      .map_err(|e| ActorError::io(format!("failed to open '{}'", output), e))?;
    Ok(BufWriter::new(file))
  }

  fn close(&mut self) -> Result<(), ActorError> {
    if let Some(mut file) = self.file.take() {
      file
        .flush()
        .map_err(|e| ActorError::io("failed to flush output file", e))?;
    }
    Ok(())
  }
}

impl Actor for DumpFile {
  fn type_name(&self) -> &'static str {
    "DumpFile"
  }

  fn description(&self) -> &'static str {
    "Sink that outputs the payloads of the data to a file."
  }

  fn options(&self) -> Vec<OptionSpec> {
    vec![
      OptionSpec::required("output", "The file to write to (string)."),
      OptionSpec::new(
        "append",
        false,
        "Whether to append to the file or overwrite (bool).",
      ),
    ]
  }

  fn quickinfo(&self, options: &Options) -> Option<String> {
    Some(format!(
      "output: '{}', append: {}",
      quick(options, "output"),
      quick(options, "append")
    ))
  }

  /// A handle left open by a run without wrapup is closed before reopening.
  fn setup(&mut self, _options: &Options) -> Result<(), ActorError> {
    self.close()
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.close()
  }
}

impl InputSink for DumpFile {
  fn accept(&mut self, token: Token, cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    if self.file.is_none() {
      self.file = Some(Self::open(cx)?);
    }
    if let Some(file) = self.file.as_mut() {
      writeln!(file, "{}", token).map_err(|e| ActorError::io("failed to write output file", e))?;
    }
    Ok(())
  }
}
