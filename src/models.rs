use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use chrono::{DateTime, Utc};

/// Task status change pushed by the bot. Every field is optional and
/// unvalidated; a JSON `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateEvent {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub telegram_id: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub task_key: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub meta: Option<Value>,
}

impl TaskUpdateEvent {
  /// Builds the event the bot sends. `meta` defaults to an empty object.
  pub fn new(telegram_id: i64, task_key: impl Into<String>, status: impl Into<String>, meta: Option<Value>) -> Self {
    Self {
      telegram_id: Some(Value::from(telegram_id)),
      task_key: Some(Value::String(task_key.into())),
      status: Some(Value::String(status.into())),
      meta: Some(meta.unwrap_or_else(|| Value::Object(Map::new()))),
    }
  }

  /// Parses a request body. Any syntactically valid JSON is accepted; a
  /// non-object document simply yields an event with no fields.
  pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
    let document: Value = serde_json::from_slice(body)?;
    Ok(Self::from_value(&document))
  }

  pub fn from_value(document: &Value) -> Self {
    let field = |name: &str| document.get(name).filter(|v| !v.is_null()).cloned();
    Self {
      telegram_id: field("telegramId"),
      task_key: field("taskKey"),
      status: field("status"),
      meta: field("meta"),
    }
  }

  pub fn telegram_id_key(&self) -> Option<String> {
    self.telegram_id.as_ref().map(value_as_key)
  }

  pub fn task_key_str(&self) -> Option<String> {
    self.task_key.as_ref().map(value_as_key)
  }

  pub fn status_str(&self) -> Option<String> {
    self.status.as_ref().map(value_as_key)
  }
}

/// Strings render without quotes, everything else as compact JSON.
pub fn value_as_key(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Log rendering for an optional field.
pub fn display_field(value: &Option<Value>) -> String {
  value.as_ref().map(value_as_key).unwrap_or_else(|| "undefined".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
  pub telegram_id: String,
  pub task_key: String,
  pub status: Option<String>,
  pub meta: Option<Value>,
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
  pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub error: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn extracts_known_fields() {
    let event = TaskUpdateEvent::from_json(
      br#"{"telegramId":123,"taskKey":"daily_login","status":"completed","meta":{"streak":5},"extra":true}"#,
    )
    .unwrap();
    assert_eq!(event.telegram_id_key().as_deref(), Some("123"));
    assert_eq!(event.task_key_str().as_deref(), Some("daily_login"));
    assert_eq!(event.status_str().as_deref(), Some("completed"));
    assert_eq!(event.meta, Some(json!({"streak": 5})));
  }

  #[test]
  fn missing_and_null_fields_are_absent() {
    let event = TaskUpdateEvent::from_json(br#"{"taskKey":null}"#).unwrap();
    assert_eq!(event, TaskUpdateEvent::default());
    assert_eq!(display_field(&event.telegram_id), "undefined");
  }

  #[test]
  fn non_object_documents_parse_to_empty_event() {
    for body in [&b"[1,2,3]"[..], b"42", b"\"text\"", b"null"] {
      assert_eq!(TaskUpdateEvent::from_json(body).unwrap(), TaskUpdateEvent::default());
    }
  }

  #[test]
  fn rejects_invalid_json() {
    assert!(TaskUpdateEvent::from_json(b"not valid json").is_err());
  }

  #[test]
  fn bot_event_uses_camel_case_and_default_meta() {
    let event = TaskUpdateEvent::new(42, "tg_referral_5", "completed", None);
    assert_eq!(
      serde_json::to_value(&event).unwrap(),
      json!({"telegramId": 42, "taskKey": "tg_referral_5", "status": "completed", "meta": {}})
    );
  }
}
