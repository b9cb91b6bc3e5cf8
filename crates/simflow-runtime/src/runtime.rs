//! The flow driver.
//!
//! [`Runtime::run`] executes a [`Flow`] in four phases: compute full names,
//! normalize options and call `setup` on every actor, drive the root, and
//! call `wrapup` on every actor whatever the outcome.
//!
//! Driving is depth-first and push based. Each output of an actor is pushed
//! through the rest of the enclosing container before the actor's next output
//! is looked at, which is what gives nested Triggers their loop semantics.

use simflow_core::{ActorContext, ActorError, ExpressionEvaluator, Storage, Token, normalize};
use tracing::{Span, debug, error, info, instrument, warn};

use crate::control::{self, Control};
use crate::error::FlowError;
use crate::flow::{ActorId, Flow, Slot, Unit};
use crate::result::{RunOptions, RunOutcome};

/// State owned by the driver for one run.
struct RunContext<'r> {
  run_id: &'r str,
  storage: Storage,
  stopped: bool,
  evaluator: &'r dyn ExpressionEvaluator,
}

/// Executes flows with an injected expression evaluator.
pub struct Runtime {
  evaluator: Box<dyn ExpressionEvaluator>,
}

impl Runtime {
  pub fn new(evaluator: impl ExpressionEvaluator + 'static) -> Self {
    Self {
      evaluator: Box::new(evaluator),
    }
  }

  /// Run a flow once.
  ///
  /// Returns the first error with the full name of the actor it came from.
  /// Stopping through a Stop actor is a successful run.
  #[instrument(
    name = "flow_run",
    skip(self, flow, options),
    fields(
      flow = %flow.name(flow.root()).unwrap_or_default(),
      run_id = tracing::field::Empty,
    )
  )]
  pub fn run(&self, flow: &mut Flow, options: &RunOptions) -> Result<RunOutcome, FlowError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    Span::current().record("run_id", run_id.as_str());

    info!(run_id = %run_id, actors = flow.len(), "run_started");

    if options.print_tree {
      println!("{}", flow.tree());
    }

    let mut run = RunContext {
      run_id: &run_id,
      storage: Storage::new(),
      stopped: false,
      evaluator: self.evaluator.as_ref(),
    };

    let result = prepare(flow, &run).and_then(|()| drive_root(flow, &mut run));

    if run.stopped && !options.wrapup_on_stop {
      debug!(run_id = %run_id, "wrapup_skipped");
    } else {
      wrapup(flow, &run);
    }

    match &result {
      Ok(()) if run.stopped => info!(run_id = %run_id, "run_stopped"),
      Ok(()) => info!(run_id = %run_id, "run_completed"),
      Err(e) => error!(run_id = %run_id, error = %e, "run_failed"),
    }
    result?;

    let stopped = run.stopped;
    let mut storage = run.storage;
    if options.cleanup {
      storage.clear();
    }

    Ok(RunOutcome {
      run_id,
      stopped,
      storage,
    })
  }
}

/// Cache full names, normalize options and set up every actor, depth-first.
fn prepare(flow: &mut Flow, run: &RunContext<'_>) -> Result<(), FlowError> {
  let order = flow.walk();

  for &(id, _) in &order {
    let full_name = flow.full_name(id)?;
    flow.slot_mut(id)?.full_name = full_name;
  }

  for &(id, _) in &order {
    let slot = flow.slot_mut(id)?;

    if let Some(control) = slot.unit.control() {
      if control.requires_children() && slot.children.is_empty() {
        return Err(FlowError::Structure {
          actor: slot.full_name.clone(),
          message: format!("{} has no children", control.type_name()),
        });
      }
    }

    slot.normalized =
      normalize(&slot.unit.options(), &slot.options).map_err(|e| FlowError::Configuration {
        actor: slot.full_name.clone(),
        source: e.into(),
      })?;

    let Slot {
      unit,
      normalized,
      full_name,
      ..
    } = slot;
    unit.setup(normalized).map_err(|source| FlowError::Setup {
      actor: full_name.clone(),
      source,
    })?;

    debug!(run_id = %run.run_id, actor = %full_name, "actor_setup");
  }

  Ok(())
}

/// Drive the root Sequence: without a token when it starts with a source,
/// with the start token otherwise.
fn drive_root(flow: &mut Flow, run: &mut RunContext<'_>) -> Result<(), FlowError> {
  let root = flow.root();
  let Some(&first) = flow.children(root)?.first() else {
    return Ok(());
  };
  let input = if flow.unit(first)?.is_source() {
    None
  } else {
    Some(Token::start())
  };
  drive(flow, run, root, 0, input)
}

/// Push `input` into the child of `parent` at `position`, then on through
/// the following siblings.
fn drive(
  flow: &mut Flow,
  run: &mut RunContext<'_>,
  parent: ActorId,
  position: usize,
  input: Option<Token>,
) -> Result<(), FlowError> {
  if run.stopped {
    return Ok(());
  }
  // past the last child: the token leaves the container
  let Some(&id) = flow.children(parent)?.get(position) else {
    return Ok(());
  };

  match flow.unit(id)?.control() {
    Some(Control::Trigger) => drive(flow, run, id, 0, input),
    Some(Control::Tee) => {
      let slot = flow.slot(id)?;
      let matched = control::tee_condition(
        &slot.normalized,
        &run.storage,
        input.as_ref(),
        run.evaluator,
      )
      .map_err(|source| FlowError::Execution {
        actor: slot.full_name.clone(),
        source,
      })?;
      debug!(run_id = %run.run_id, actor = %slot.full_name, matched, "tee_evaluated");

      if matched {
        drive(flow, run, id, 0, input.clone())?;
        if run.stopped {
          return Ok(());
        }
      }
      drive(flow, run, parent, position + 1, input)
    }
    Some(Control::Stop) => {
      run.stopped = true;
      info!(run_id = %run.run_id, actor = %flow.slot(id)?.full_name, "stop_requested");
      Ok(())
    }
    Some(Control::Sequence) => Err(FlowError::Structure {
      actor: flow.slot(id)?.full_name.clone(),
      message: "a Sequence can only be the root of a flow".to_string(),
    }),
    None => {
      let outputs = execute(flow, run, id, input)?;
      for output in outputs {
        if run.stopped {
          break;
        }
        drive(flow, run, parent, position + 1, Some(output))?;
      }
      Ok(())
    }
  }
}

/// Run one leaf actor on its input and collect its outputs.
fn execute(
  flow: &mut Flow,
  run: &mut RunContext<'_>,
  id: ActorId,
  input: Option<Token>,
) -> Result<Vec<Token>, FlowError> {
  let Slot {
    unit,
    normalized,
    full_name,
    ..
  } = flow.slot_mut(id)?;

  let mut cx = ActorContext::new(full_name, normalized, &mut run.storage, run.evaluator);
  let outputs = invoke(unit, input, &mut cx).map_err(|source| FlowError::Execution {
    actor: full_name.clone(),
    source,
  })?;

  debug!(
    run_id = %run.run_id,
    actor = %full_name,
    outputs = outputs.len(),
    "actor_executed"
  );
  Ok(outputs)
}

fn invoke(
  unit: &mut Unit,
  input: Option<Token>,
  cx: &mut ActorContext<'_>,
) -> Result<Vec<Token>, ActorError> {
  match unit {
    Unit::Source(actor) => actor.emit(cx),
    Unit::Transformer(actor) => {
      let token = input.ok_or(ActorError::MissingInput)?;
      actor.check_input(&token)?;
      actor.accept(token, cx)?;
      actor.emit(cx)
    }
    Unit::Sink(actor) => {
      let token = input.ok_or(ActorError::MissingInput)?;
      actor.check_input(&token)?;
      actor.accept(token, cx)?;
      Ok(Vec::new())
    }
    Unit::Control(control) => Err(ActorError::failed(format!(
      "{} is not a leaf actor",
      control.type_name()
    ))),
  }
}

/// Call `wrapup` on every actor; failures are logged, not returned.
fn wrapup(flow: &mut Flow, run: &RunContext<'_>) {
  for (id, _) in flow.walk() {
    let Ok(slot) = flow.slot_mut(id) else {
      continue;
    };
    if let Err(e) = slot.unit.wrapup() {
      warn!(run_id = %run.run_id, actor = %slot.full_name, error = %e, "wrapup_failed");
    }
  }
}
