//! Request payloads.

use serde_json::{Value, json};

/// Body sent with a call.
///
/// Text payloads are kept as given and only interpreted when the request is
/// built: valid JSON text is sent as that JSON, anything else is wrapped as
/// `{ "data": <text> }`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
  Json(Value),
  Text(String),
}

impl Payload {
  /// The JSON body to send.
  pub fn to_body(&self) -> Value {
    match self {
      Payload::Json(value) => value.clone(),
      Payload::Text(text) => {
        serde_json::from_str(text).unwrap_or_else(|_| json!({ "data": text }))
      }
    }
  }
}

impl Default for Payload {
  fn default() -> Self {
    Payload::Json(json!({}))
  }
}

impl From<Value> for Payload {
  fn from(value: Value) -> Self {
    match value {
      Value::String(text) => Payload::Text(text),
      other => Payload::Json(other),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_text_that_is_not_json_is_wrapped() {
    let payload = Payload::Text("not json".to_string());
    assert_eq!(payload.to_body(), json!({ "data": "not json" }));
  }

  #[test]
  fn test_json_text_is_parsed() {
    let payload = Payload::Text(r#"{"a": 1, "b": [true]}"#.to_string());
    assert_eq!(payload.to_body(), json!({ "a": 1, "b": [true] }));
  }

  #[test]
  fn test_from_value_keeps_strings_as_text() {
    assert_eq!(
      Payload::from(json!("hello")),
      Payload::Text("hello".to_string())
    );
    assert_eq!(Payload::from(json!({ "x": 1 })), Payload::Json(json!({ "x": 1 })));
  }

  #[test]
  fn test_default_is_empty_object() {
    assert_eq!(Payload::default().to_body(), json!({}));
  }
}
