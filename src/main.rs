use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use simflow_actors::conversion;
use simflow_config::FlowDef;
use simflow_lua::LuaEvaluator;
use simflow_resolver::{ActorRegistry, Resolver, StandardRegistry, StandardResolver};
use simflow_runtime::{Control, RunOptions, Runtime, Unit};

/// Simflow - declarative actor flows with nested-loop semantics
#[derive(Parser)]
#[command(name = "simflow")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a flow definition
  Run {
    /// Path to the flow file (JSON)
    flow_file: PathBuf,

    /// Print the actor tree before running
    #[arg(long)]
    print_tree: bool,

    /// Keep storage after the run and print it
    #[arg(long)]
    no_cleanup: bool,

    /// Skip wrapup when a Stop actor ends the run
    #[arg(long)]
    no_wrapup_on_stop: bool,
  },

  /// Show the options of an actor type
  Help {
    /// The actor type, e.g. ForLoop
    actor_type: String,
  },

  /// List the available actor types
  List,
}

fn main() -> Result<()> {
  init_tracing()?;

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Run {
      flow_file,
      print_tree,
      no_cleanup,
      no_wrapup_on_stop,
    }) => {
      let options = RunOptions {
        print_tree,
        cleanup: !no_cleanup,
        wrapup_on_stop: !no_wrapup_on_stop,
      };
      run_flow(flow_file, options)?;
    }
    Some(Commands::Help { actor_type }) => {
      print_help(&actor_type)?;
    }
    Some(Commands::List) => {
      let registry = StandardRegistry::with_builtins();
      println!("Sequence");
      for name in registry.type_names() {
        println!("{}", name);
      }
    }
    None => {
      println!("simflow - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing() -> Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(io::stderr).with_target(false))
    .try_init()
    .context("failed to initialize tracing subscriber")?;
  Ok(())
}

fn run_flow(flow_file: PathBuf, options: RunOptions) -> Result<()> {
  // Read flow definition
  let flow_content = std::fs::read_to_string(&flow_file)
    .with_context(|| format!("failed to read flow file: {}", flow_file.display()))?;

  let flow_def = FlowDef::from_json(&flow_content)
    .with_context(|| format!("failed to parse flow file: {}", flow_file.display()))?;

  // Resolve flow
  let resolver = StandardResolver::new(StandardRegistry::with_builtins());
  let mut flow = resolver
    .resolve(&flow_def)
    .context("failed to resolve flow")?;

  // Execute flow
  let evaluator = LuaEvaluator::new().context("failed to create expression evaluator")?;
  let runtime = Runtime::new(evaluator);
  let outcome = runtime
    .run(&mut flow, &options)
    .context("flow execution failed")?;

  if outcome.stopped {
    eprintln!("Run {} stopped", outcome.run_id);
  }

  if !options.cleanup {
    let storage: serde_json::Map<String, serde_json::Value> = outcome
      .storage
      .names()
      .into_iter()
      .filter_map(|name| {
        outcome
          .storage
          .get(name)
          .map(|value| (name.to_string(), value.clone()))
      })
      .collect();
    eprintln!("Storage: {}", serde_json::to_string_pretty(&storage)?);
  }

  Ok(())
}

fn print_help(actor_type: &str) -> Result<()> {
  let unit = if actor_type == Control::Sequence.type_name() {
    Unit::Control(Control::Sequence)
  } else {
    match StandardRegistry::with_builtins().create(actor_type) {
      Some(unit) => unit,
      None => bail!("unknown actor type '{}' (use `simflow list`)", actor_type),
    }
  };
  println!("{}", unit.help());
  if unit.type_name() == "Convert" {
    println!("\n{}", conversion::help());
  }
  Ok(())
}
