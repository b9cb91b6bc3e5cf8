//! Simflow Lua
//!
//! [`LuaEvaluator`] implements [`ExpressionEvaluator`] on top of an embedded
//! Lua 5.4 state. Expressions are evaluated as `return <expr>`, so anything
//! that is a valid Lua expression works, including `math.*` calls.
//!
//! A few spellings common in flow definitions are accepted as well:
//! `!=` is rewritten to `~=`, `**` to `^`, and the helpers `int`, `float`,
//! `str`, `True` and `False` are defined as globals.

use mlua::{Function, Lua, LuaOptions, StdLib, Value as LuaValue};
use serde_json::{Number, Value};
use simflow_core::{ExpressionError, ExpressionEvaluator};

/// Base library functions that reach outside the state.
const REMOVED_GLOBALS: &[&str] = &["dofile", "loadfile", "load", "require", "collectgarbage"];

/// Expression evaluator backed by a sandboxed Lua state.
pub struct LuaEvaluator {
  lua: Lua,
}

impl LuaEvaluator {
  /// Create a state with only the `math`, `string` and `table` libraries.
  pub fn new() -> Result<Self, ExpressionError> {
    let lua = Lua::new_with(
      StdLib::MATH | StdLib::STRING | StdLib::TABLE,
      LuaOptions::default(),
    )
    .map_err(|e| ExpressionError::new("<init>", e.to_string()))?;

    install_globals(&lua).map_err(|e| ExpressionError::new("<init>", e.to_string()))?;

    Ok(Self { lua })
  }
}

fn install_globals(lua: &Lua) -> mlua::Result<()> {
  let globals = lua.globals();

  for name in REMOVED_GLOBALS {
    globals.set(*name, LuaValue::Nil)?;
  }

  globals.set("int", lua.create_function(|_, x: f64| Ok(x.trunc() as i64))?)?;
  globals.set("float", lua.create_function(|_, x: f64| Ok(x))?)?;
  globals.set("str", globals.get::<Function>("tostring")?)?;
  globals.set("True", true)?;
  globals.set("False", false)?;

  Ok(())
}

/// Translate the non-Lua operator spellings outside of quoted strings.
fn rewrite(expression: &str) -> String {
  let mut result = String::with_capacity(expression.len());
  let mut quote: Option<char> = None;
  let mut chars = expression.chars().peekable();

  while let Some(c) = chars.next() {
    match quote {
      Some(q) => {
        result.push(c);
        if c == '\\' {
          if let Some(escaped) = chars.next() {
            result.push(escaped);
          }
        } else if c == q {
          quote = None;
        }
      }
      None => match (c, chars.peek().copied()) {
        ('\'' | '"', _) => {
          quote = Some(c);
          result.push(c);
        }
        ('!', Some('=')) => {
          chars.next();
          result.push_str("~=");
        }
        ('*', Some('*')) => {
          chars.next();
          result.push('^');
        }
        _ => result.push(c),
      },
    }
  }

  result
}

fn to_json(expression: &str, value: LuaValue) -> Result<Value, ExpressionError> {
  match value {
    LuaValue::Nil => Ok(Value::Null),
    LuaValue::Boolean(b) => Ok(Value::Bool(b)),
    LuaValue::Integer(i) => Ok(Value::from(i)),
    LuaValue::Number(n) => Number::from_f64(n)
      .map(Value::Number)
      .ok_or_else(|| ExpressionError::new(expression, format!("result is not finite: {}", n))),
    LuaValue::String(s) => {
      let text: String = s.to_string_lossy().into();
      Ok(Value::String(text))
    }
    other => Err(ExpressionError::new(
      expression,
      format!("unsupported result type '{}'", other.type_name()),
    )),
  }
}

impl ExpressionEvaluator for LuaEvaluator {
  fn evaluate(&self, expression: &str) -> Result<Value, ExpressionError> {
    let chunk = format!("return {}", rewrite(expression));
    let value = self
      .lua
      .load(chunk)
      .set_name("expression")
      .eval::<LuaValue>()
      .map_err(|e| ExpressionError::new(expression, e.to_string()))?;
    to_json(expression, value)
  }
}
