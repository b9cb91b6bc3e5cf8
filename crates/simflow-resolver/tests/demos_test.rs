//! Resolves and runs the flow definitions shipped in `demos/`.
//!
//! Console sinks are swapped for DumpFile sinks so the output can be checked.

use std::path::Path;

use serde_json::json;
use simflow_config::{ActorDef, FlowDef};
use simflow_lua::LuaEvaluator;
use simflow_resolver::{ResolveError, Resolver, StandardRegistry, StandardResolver};
use simflow_runtime::{RunOptions, RunOutcome, Runtime};

const FOR_LOOP: &str = include_str!("../../../demos/for_loop.json");
const COMBINE_STORAGE: &str = include_str!("../../../demos/combine_storage.json");
const INIT_STORAGE_VALUE: &str = include_str!("../../../demos/init_storage_value.json");
const UPDATE_STORAGE_VALUE: &str = include_str!("../../../demos/update_storage_value.json");
const STOP_FLOW: &str = include_str!("../../../demos/stop_flow.json");
const MATH_EXPRESSION: &str = include_str!("../../../demos/math_expression.json");
const LIST_FILES: &str = include_str!("../../../demos/list_files.json");

fn resolver() -> StandardResolver<StandardRegistry> {
  StandardResolver::new(StandardRegistry::with_builtins())
}

fn redirect_console(actors: &mut [ActorDef], output: &Path) {
  for actor in actors {
    if actor.actor_type == "Console" {
      actor.actor_type = "DumpFile".to_string();
      actor.options.clear();
      actor
        .options
        .insert("output".to_string(), json!(output.display().to_string()));
    }
    redirect_console(&mut actor.actors, output);
  }
}

/// Run a demo and return its outcome plus the lines its console would print.
fn run_demo(text: &str, options: RunOptions) -> (RunOutcome, Vec<String>) {
  let dir = tempfile::tempdir().unwrap();
  let output = dir.path().join("console.txt");

  let mut def = FlowDef::from_json(text).unwrap();
  redirect_console(&mut def.actors, &output);

  let mut flow = resolver().resolve(&def).unwrap();
  let runtime = Runtime::new(LuaEvaluator::new().unwrap());
  let outcome = runtime.run(&mut flow, &options).unwrap();

  let lines = std::fs::read_to_string(&output)
    .unwrap_or_default()
    .lines()
    .map(str::to_string)
    .collect();
  (outcome, lines)
}

#[test]
fn test_for_loop_demo() {
  let (_, lines) = run_demo(FOR_LOOP, RunOptions::default());
  assert_eq!(lines, vec!["1", "1", "2", "1", "2", "3"]);
}

#[test]
fn test_combine_storage_demo() {
  let (_, lines) = run_demo(COMBINE_STORAGE, RunOptions::default());
  assert_eq!(
    lines,
    vec!["1 / 1", "2 / 1", "2 / 2", "3 / 1", "3 / 2", "3 / 3"]
  );
}

#[test]
fn test_init_storage_value_demo() {
  let (_, lines) = run_demo(INIT_STORAGE_VALUE, RunOptions::default());
  assert_eq!(lines, vec!["1", "2", "3"]);
}

#[test]
fn test_update_storage_value_demo() {
  let options = RunOptions {
    cleanup: false,
    ..RunOptions::default()
  };
  let (outcome, lines) = run_demo(UPDATE_STORAGE_VALUE, options);

  assert_eq!(lines.len(), 3 + 5 + 7);
  assert_eq!(outcome.storage.get("max"), Some(&json!(7)));
}

#[test]
fn test_stop_flow_demo() {
  let (outcome, lines) = run_demo(STOP_FLOW, RunOptions::default());
  assert!(outcome.stopped);
  assert_eq!(lines, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_math_expression_demo() {
  let (_, lines) = run_demo(MATH_EXPRESSION, RunOptions::default());
  assert_eq!(lines.len(), 100);
  assert_eq!(lines[0], "1.0");
  assert_eq!(lines[3], "2.0");
  assert_eq!(lines[99], "10.0");
}

#[test]
fn test_list_files_demo() {
  let dir = tempfile::tempdir().unwrap();
  for name in ["car.txt", "bus.txt", "tree.md"] {
    std::fs::write(dir.path().join(name), name).unwrap();
  }
  std::fs::create_dir(dir.path().join("rooms")).unwrap();

  let mut def = FlowDef::from_json(LIST_FILES).unwrap();
  def.actors[0]
    .options
    .insert("dir".to_string(), json!(dir.path().display().to_string()));
  let text = def.to_json().unwrap();

  let (_, lines) = run_demo(&text, RunOptions::default());
  assert_eq!(
    lines,
    vec![
      dir.path().join("car.txt").display().to_string(),
      dir.path().join("tree.md").display().to_string(),
    ]
  );
}

#[test]
fn test_for_loop_tree() {
  let def = FlowDef::from_json(FOR_LOOP).unwrap();
  let flow = resolver().resolve(&def).unwrap();

  assert_eq!(
    flow.tree(),
    "example loop (Sequence)\n\
     \x20 outer (ForLoop) [min: 1, max: 3, step: 1]\n\
     \x20 SetStorageValue (SetStorageValue) [name: max]\n\
     \x20 Trigger (Trigger)\n\
     \x20   inner (ForLoop) [min: 1, max: @{max}, step: 1]\n\
     \x20   Console (Console) [prefix: '']\n"
  );
}

#[test]
fn test_unknown_actor_type() {
  let def = FlowDef {
    name: "bad".to_string(),
    actors: vec![ActorDef::new("Trigger").child(ActorDef::new("Teleport").named("beam"))],
  };

  let err = resolver().resolve(&def).unwrap_err();
  assert_eq!(err.to_string(), "unknown actor type 'Teleport' at 'bad.Trigger.beam'");
}

#[test]
fn test_children_on_leaf_actor() {
  let def = FlowDef {
    name: "bad".to_string(),
    actors: vec![ActorDef::new("ForLoop").child(ActorDef::new("Console"))],
  };

  let err = resolver().resolve(&def).unwrap_err();
  assert!(matches!(err, ResolveError::ChildrenNotAllowed { .. }));
}

#[test]
fn test_duplicate_sibling_names() {
  let def = FlowDef {
    name: "bad".to_string(),
    actors: vec![
      ActorDef::new("ForLoop").named("loop"),
      ActorDef::new("Console").named("loop"),
    ],
  };

  let err = resolver().resolve(&def).unwrap_err();
  assert!(matches!(err, ResolveError::Flow(_)));
}
