use crate::options::OptionSpec;
use crate::value::display_value;

/// Render the help text for an actor type.
pub fn generate_help(type_name: &str, description: &str, options: &[OptionSpec]) -> String {
  let mut lines = vec![
    type_name.to_string(),
    "=".repeat(type_name.chars().count()),
    String::new(),
    description.to_string(),
  ];

  if !options.is_empty() {
    lines.push(String::new());
    lines.push("Options:".to_string());
    for spec in options {
      let default = match &spec.default {
        Some(value) => format!("default: {}", display_value(value)),
        None => "required".to_string(),
      };
      lines.push(format!("{} ({})", spec.name, default));
      lines.push(format!("  {}", spec.help));
    }
  }

  lines.join("\n")
}
