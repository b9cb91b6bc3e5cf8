use serde::{Deserialize, Serialize};

use crate::actor::ActorDef;

/// Definition of a complete flow: a named root sequence of actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDef {
  pub name: String,
  #[serde(default)]
  pub actors: Vec<ActorDef>,
}

impl FlowDef {
  /// Parse a flow definition from JSON text.
  pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(text)
  }

  /// Serialize the flow definition as pretty-printed JSON.
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_parse_nested_flow() {
    let text = r#"{
      "name": "example loop",
      "actors": [
        { "type": "ForLoop", "name": "outer", "options": { "max": 3 } },
        { "type": "SetStorageValue", "options": { "storage_name": "max" } },
        {
          "type": "Trigger",
          "actors": [
            { "type": "ForLoop", "name": "inner", "options": { "max": "@{max}" } },
            { "type": "Console" }
          ]
        }
      ]
    }"#;

    let def = FlowDef::from_json(text).unwrap();

    assert_eq!(def.name, "example loop");
    assert_eq!(def.actors.len(), 3);
    assert_eq!(def.actors[0].name.as_deref(), Some("outer"));
    assert_eq!(def.actors[0].options["max"], json!(3));
    assert_eq!(def.actors[1].name, None);
    assert_eq!(def.actors[2].actors.len(), 2);
    assert_eq!(def.actors[2].actors[0].options["max"], json!("@{max}"));
  }

  #[test]
  fn test_builder_matches_parsed() {
    let built = FlowDef {
      name: "stop".to_string(),
      actors: vec![
        ActorDef::new("ForLoop").option("max", 10),
        ActorDef::new("Tee")
          .option("condition", "@{current} == 7")
          .child(ActorDef::new("Stop")),
      ],
    };

    let parsed = FlowDef::from_json(&built.to_json().unwrap()).unwrap();
    assert_eq!(parsed, built);
  }

  #[test]
  fn test_missing_type_is_rejected() {
    let result = FlowDef::from_json(r#"{ "name": "bad", "actors": [ { "name": "x" } ] }"#);
    assert!(result.is_err());
  }
}
