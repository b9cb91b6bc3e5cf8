//! Control actors: nodes that change how tokens travel through the tree
//! instead of transforming them.
//!
//! | actor    | children | behavior                                               |
//! |----------|----------|--------------------------------------------------------|
//! | Sequence | any      | root only; tokens flow left to right through children  |
//! | Trigger  | 1+       | drives its children with each token, forwards nothing  |
//! | Tee      | 1+       | drives its children when `condition` holds, forwards   |
//! | Stop     | none     | ends the whole run                                     |

use simflow_core::template::substitute_current;
use simflow_core::value::display_value;
use simflow_core::{ActorError, ExpressionEvaluator, OptionSpec, Options, Storage, Token};

/// The traversal-altering actor kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
  Sequence,
  Trigger,
  Tee,
  Stop,
}

impl Control {
  pub fn type_name(self) -> &'static str {
    match self {
      Control::Sequence => "Sequence",
      Control::Trigger => "Trigger",
      Control::Tee => "Tee",
      Control::Stop => "Stop",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Control::Sequence => "Executes its actors one after the other, passing tokens from left to right.",
      Control::Trigger => {
        "Executes its sub-flow for every token it receives; nothing is passed on to the next actor."
      }
      Control::Tee => {
        "Executes its sub-flow with the current token if the condition evaluates to true. \
         The token is always passed on to the next actor.\n\
         The payload is available through {X} and storage values through @{name}."
      }
      Control::Stop => "Stops the execution of the flow.",
    }
  }

  pub fn options(self) -> Vec<OptionSpec> {
    match self {
      Control::Tee => vec![OptionSpec::new(
        "condition",
        "true",
        "The boolean expression deciding whether to execute the sub-flow (string).",
      )],
      _ => Vec::new(),
    }
  }

  pub fn quickinfo(self, options: &Options) -> Option<String> {
    match self {
      Control::Tee => options
        .get("condition")
        .map(|condition| format!("condition: {}", display_value(condition))),
      _ => None,
    }
  }

  /// Whether actors can be appended to this one.
  pub fn accepts_children(self) -> bool {
    matches!(self, Control::Sequence | Control::Trigger | Control::Tee)
  }

  /// Whether running without children is a structural error.
  pub fn requires_children(self) -> bool {
    matches!(self, Control::Trigger | Control::Tee)
  }
}

/// Evaluate a Tee's `condition` for the given token.
///
/// Storage references are expanded first, then `{X}` is replaced by the
/// payload, so payload text is never read as a template. The result must be
/// a boolean.
pub(crate) fn tee_condition(
  options: &Options,
  storage: &Storage,
  token: Option<&Token>,
  evaluator: &dyn ExpressionEvaluator,
) -> Result<bool, ActorError> {
  let condition = options
    .get("condition")
    .map(display_value)
    .ok_or_else(|| ActorError::invalid_option("condition", "is not configured"))?;

  let condition = storage.expand(&condition)?;
  let condition = match token {
    Some(token) => substitute_current(&condition, &display_value(token.payload())),
    None => condition,
  };

  Ok(evaluator.evaluate_bool(&condition)?)
}
