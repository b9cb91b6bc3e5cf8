//! Integration tests for Runtime::run using the leaf actor library.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use simflow_actors::{
  CombineStorage, ForLoop, InitStorageValue, MathExpression, Null, SetStorageValue, Start,
  StringConstants, UpdateStorageValue,
};
use simflow_core::{Actor, ActorContext, ActorError, InputSink, Token};
use simflow_lua::LuaEvaluator;
use simflow_runtime::{ActorId, Flow, FlowError, RunOptions, Runtime, Unit};

/// Sink that records every payload and counts its wrapups.
#[derive(Clone, Default)]
struct Recorder {
  seen: Arc<Mutex<Vec<Value>>>,
  wrapups: Arc<AtomicUsize>,
}

impl Recorder {
  fn values(&self) -> Vec<Value> {
    self.seen.lock().unwrap().clone()
  }

  fn wrapups(&self) -> usize {
    self.wrapups.load(Ordering::SeqCst)
  }
}

impl Actor for Recorder {
  fn type_name(&self) -> &'static str {
    "Recorder"
  }

  fn description(&self) -> &'static str {
    "Records every payload it receives."
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    self.wrapups.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

impl InputSink for Recorder {
  fn accept(&mut self, token: Token, _cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    self.seen.lock().unwrap().push(token.into_payload());
    Ok(())
  }
}

/// Sink whose wrapup always fails.
struct FailingWrapup;

impl Actor for FailingWrapup {
  fn type_name(&self) -> &'static str {
    "FailingWrapup"
  }

  fn description(&self) -> &'static str {
    "Fails to release its resources."
  }

  fn wrapup(&mut self) -> Result<(), ActorError> {
    Err(ActorError::failed("boom"))
  }
}

impl InputSink for FailingWrapup {
  fn accept(&mut self, _token: Token, _cx: &mut ActorContext<'_>) -> Result<(), ActorError> {
    Ok(())
  }
}

fn runtime() -> Runtime {
  Runtime::new(LuaEvaluator::new().unwrap())
}

fn for_loop(flow: &mut Flow, parent: ActorId, name: &str, max: Value) -> ActorId {
  let id = flow.append(parent, Unit::source(ForLoop)).unwrap();
  flow.set_name(id, name).unwrap();
  flow.set_option(id, "max", max).unwrap();
  id
}

fn set_storage(flow: &mut Flow, parent: ActorId, storage_name: &str) -> ActorId {
  let id = flow
    .append(parent, Unit::transformer(SetStorageValue::default()))
    .unwrap();
  flow.set_option(id, "storage_name", storage_name).unwrap();
  id
}

fn record(flow: &mut Flow, parent: ActorId, recorder: &Recorder) -> ActorId {
  flow.append(parent, Unit::sink(recorder.clone())).unwrap()
}

fn ints(values: &[i64]) -> Vec<Value> {
  values.iter().map(|v| json!(v)).collect()
}

#[test]
fn test_for_loop_emits_inclusive_range() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("loop");
  let root = flow.root();
  for_loop(&mut flow, root, "counter", json!(3));
  record(&mut flow, root, &recorder);

  let outcome = runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(recorder.values(), ints(&[1, 2, 3]));
  assert!(!outcome.stopped);
  assert!(outcome.storage.is_empty());
  assert_eq!(recorder.wrapups(), 1);
}

#[test]
fn test_root_without_source_receives_start_token() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("start");
  let root = flow.root();
  record(&mut flow, root, &recorder);

  runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(recorder.values(), vec![Value::Null]);
}

#[test]
fn test_trigger_inner_loop_reads_outer_storage() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("example loop");
  let root = flow.root();
  for_loop(&mut flow, root, "outer", json!(3));
  set_storage(&mut flow, root, "max");
  let trigger = flow.append(root, Unit::trigger()).unwrap();
  for_loop(&mut flow, trigger, "inner", json!("@{max}"));
  record(&mut flow, trigger, &recorder);

  runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(recorder.values(), ints(&[1, 1, 2, 1, 2, 3]));
}

#[test]
fn test_nested_triggers_multiply_invocations() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("combine storage");
  let root = flow.root();
  flow.append(root, Unit::source(Start)).unwrap();
  let outer_trigger = flow.append(root, Unit::trigger()).unwrap();
  for_loop(&mut flow, outer_trigger, "outer", json!(3));
  set_storage(&mut flow, outer_trigger, "outer");
  let inner_trigger = flow.append(outer_trigger, Unit::trigger()).unwrap();
  for_loop(&mut flow, inner_trigger, "inner", json!(2));
  set_storage(&mut flow, inner_trigger, "inner");
  let combine_trigger = flow.append(inner_trigger, Unit::trigger()).unwrap();
  let combine = flow
    .append(combine_trigger, Unit::source(CombineStorage))
    .unwrap();
  flow.set_option(combine, "format", "@{outer} / @{inner}").unwrap();
  record(&mut flow, combine_trigger, &recorder);

  runtime().run(&mut flow, &RunOptions::default()).unwrap();

  let expected: Vec<Value> = ["1 / 1", "1 / 2", "2 / 1", "2 / 2", "3 / 1", "3 / 2"]
    .iter()
    .map(|s| json!(s))
    .collect();
  assert_eq!(recorder.values(), expected);
}

#[test]
fn test_tee_forwards_every_token_and_branches_on_match() {
  let branch = Recorder::default();
  let main = Recorder::default();
  let mut flow = Flow::new("tee");
  let root = flow.root();
  for_loop(&mut flow, root, "counter", json!(10));
  set_storage(&mut flow, root, "current");
  let tee = flow.append(root, Unit::tee()).unwrap();
  flow.set_option(tee, "condition", "@{current} == 7").unwrap();
  record(&mut flow, tee, &branch);
  record(&mut flow, root, &main);

  runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(branch.values(), ints(&[7]));
  assert_eq!(main.values(), ints(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]));
}

#[test]
fn test_tee_condition_on_payload() {
  let branch = Recorder::default();
  let mut flow = Flow::new("tee");
  let root = flow.root();
  for_loop(&mut flow, root, "counter", json!(6));
  let tee = flow.append(root, Unit::tee()).unwrap();
  flow.set_option(tee, "condition", "{X} % 2 == 0").unwrap();
  record(&mut flow, tee, &branch);

  runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(branch.values(), ints(&[2, 4, 6]));
}

#[test]
fn test_tee_does_not_expand_payload_text() {
  let main = Recorder::default();
  let mut flow = Flow::new("payload");
  let root = flow.root();
  let strings = flow.append(root, Unit::source(StringConstants)).unwrap();
  flow
    .set_option(strings, "strings", json!(["user@{host}", "x"]))
    .unwrap();
  let tee = flow.append(root, Unit::tee()).unwrap();
  flow.set_option(tee, "condition", "'{X}' == 'x'").unwrap();
  flow.append(tee, Unit::sink(Null)).unwrap();
  record(&mut flow, root, &main);

  runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(main.values(), vec![json!("user@{host}"), json!("x")]);
}

#[test]
fn test_storage_written_in_trigger_is_visible_downstream() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("visibility");
  let root = flow.root();
  for_loop(&mut flow, root, "outer", json!(2));
  let tee = flow.append(root, Unit::tee()).unwrap();
  let trigger = flow.append(tee, Unit::trigger()).unwrap();
  for_loop(&mut flow, trigger, "inner", json!(3));
  set_storage(&mut flow, trigger, "inner");
  let math = flow
    .append(root, Unit::transformer(MathExpression::default()))
    .unwrap();
  flow
    .set_option(math, "expression", "@{inner} * 10 + {X}")
    .unwrap();
  record(&mut flow, root, &recorder);

  runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(recorder.values(), ints(&[31, 32]));
}

#[test]
fn test_failed_wrapup_does_not_fail_the_run() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("wrapup");
  let root = flow.root();
  for_loop(&mut flow, root, "counter", json!(2));
  let tee = flow.append(root, Unit::tee()).unwrap();
  flow.append(tee, Unit::sink(FailingWrapup)).unwrap();
  record(&mut flow, root, &recorder);

  let outcome = runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert!(!outcome.stopped);
  assert_eq!(recorder.values(), ints(&[1, 2]));
  assert_eq!(recorder.wrapups(), 1);
}

fn stop_flow(recorder: &Recorder) -> Flow {
  let mut flow = Flow::new("stopping the flow");
  let root = flow.root();
  for_loop(&mut flow, root, "counter", json!(10));
  set_storage(&mut flow, root, "current");
  let tee = flow.append(root, Unit::tee()).unwrap();
  flow.set_option(tee, "condition", "@{current} == 7").unwrap();
  flow.append(tee, Unit::stop()).unwrap();
  record(&mut flow, root, recorder);
  flow
}

#[test]
fn test_stop_halts_the_run() {
  let recorder = Recorder::default();
  let mut flow = stop_flow(&recorder);

  let outcome = runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert!(outcome.stopped);
  assert_eq!(recorder.values(), ints(&[1, 2, 3, 4, 5, 6]));
  assert_eq!(recorder.wrapups(), 1);
}

#[test]
fn test_stop_skips_wrapup_when_configured() {
  let recorder = Recorder::default();
  let mut flow = stop_flow(&recorder);
  let options = RunOptions {
    wrapup_on_stop: false,
    ..RunOptions::default()
  };

  let outcome = runtime().run(&mut flow, &options).unwrap();

  assert!(outcome.stopped);
  assert_eq!(recorder.wrapups(), 0);
}

#[test]
fn test_stop_in_nested_trigger_halts_outer_loop() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("nested stop");
  let root = flow.root();
  for_loop(&mut flow, root, "outer", json!(3));
  let trigger = flow.append(root, Unit::trigger()).unwrap();
  for_loop(&mut flow, trigger, "inner", json!(3));
  set_storage(&mut flow, trigger, "inner");
  let tee = flow.append(trigger, Unit::tee()).unwrap();
  flow.set_option(tee, "condition", "@{inner} == 2").unwrap();
  flow.append(tee, Unit::stop()).unwrap();
  record(&mut flow, trigger, &recorder);

  let outcome = runtime().run(&mut flow, &RunOptions::default()).unwrap();

  assert!(outcome.stopped);
  assert_eq!(recorder.values(), ints(&[1]));
}

#[test]
fn test_update_storage_value_without_cleanup() {
  let mut flow = Flow::new("update storage value");
  let root = flow.root();
  flow.append(root, Unit::source(Start)).unwrap();
  let init = flow
    .append(root, Unit::transformer(InitStorageValue::default()))
    .unwrap();
  flow.set_option(init, "storage_name", "max").unwrap();
  flow.set_option(init, "value", "int(1)").unwrap();
  let update = flow
    .append(root, Unit::transformer(UpdateStorageValue::default()))
    .unwrap();
  flow.set_option(update, "storage_name", "max").unwrap();
  flow.set_option(update, "expression", "{X} + 2").unwrap();

  let options = RunOptions {
    cleanup: false,
    ..RunOptions::default()
  };
  let outcome = runtime().run(&mut flow, &options).unwrap();

  assert_eq!(outcome.storage.get("max"), Some(&json!(3)));
}

#[test]
fn test_running_twice_gives_identical_output() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("example loop");
  let root = flow.root();
  for_loop(&mut flow, root, "outer", json!(2));
  set_storage(&mut flow, root, "max");
  let trigger = flow.append(root, Unit::trigger()).unwrap();
  for_loop(&mut flow, trigger, "inner", json!("@{max}"));
  record(&mut flow, trigger, &recorder);

  let runtime = runtime();
  let first = runtime.run(&mut flow, &RunOptions::default()).unwrap();
  let once = recorder.values();
  let second = runtime.run(&mut flow, &RunOptions::default()).unwrap();

  assert_eq!(once, ints(&[1, 1, 2]));
  assert_eq!(recorder.values(), [once.clone(), once].concat());
  assert_ne!(first.run_id, second.run_id);
  assert_eq!(recorder.wrapups(), 2);
}

#[test]
fn test_unresolved_template_names_the_actor() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("broken");
  let root = flow.root();
  for_loop(&mut flow, root, "outer", json!(2));
  let trigger = flow.append(root, Unit::trigger()).unwrap();
  for_loop(&mut flow, trigger, "inner", json!("@{missing}"));
  record(&mut flow, trigger, &recorder);

  let err = runtime().run(&mut flow, &RunOptions::default()).unwrap_err();

  assert!(matches!(
    &err,
    FlowError::Execution {
      source: ActorError::Storage(_),
      ..
    }
  ));
  assert_eq!(err.actor(), Some("broken.Trigger.inner"));
  assert_eq!(
    err.to_string(),
    "execution failed in 'broken.Trigger.inner': no storage item called 'missing'"
  );
  assert!(recorder.values().is_empty());
  assert_eq!(recorder.wrapups(), 1);
}

#[test]
fn test_trigger_without_children_is_a_structure_error() {
  let recorder = Recorder::default();
  let mut flow = Flow::new("empty");
  let root = flow.root();
  flow.append(root, Unit::trigger()).unwrap();
  record(&mut flow, root, &recorder);

  let err = runtime().run(&mut flow, &RunOptions::default()).unwrap_err();

  assert!(matches!(err, FlowError::Structure { .. }));
  assert_eq!(err.actor(), Some("empty.Trigger"));
  assert_eq!(recorder.wrapups(), 1);
}

#[test]
fn test_unknown_option_is_a_configuration_error() {
  let mut flow = Flow::new("options");
  let root = flow.root();
  let id = flow.append(root, Unit::source(ForLoop)).unwrap();
  flow.set_option(id, "maximum", 3).unwrap();

  let err = runtime().run(&mut flow, &RunOptions::default()).unwrap_err();

  assert!(matches!(err, FlowError::Configuration { .. }));
  assert!(err.to_string().contains("unknown option 'maximum'"));
}

#[test]
fn test_invalid_step_fails_setup() {
  let mut flow = Flow::new("options");
  let root = flow.root();
  let id = flow.append(root, Unit::source(ForLoop)).unwrap();
  flow.set_option(id, "step", -1).unwrap();

  let err = runtime().run(&mut flow, &RunOptions::default()).unwrap_err();

  assert!(matches!(err, FlowError::Setup { .. }));
  assert_eq!(err.actor(), Some("options.ForLoop"));
}
