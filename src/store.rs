use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use crate::config::StoreBackend;
use crate::models::{TaskRecord, TaskUpdateEvent};

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("task update is missing '{0}'")]
  MissingField(&'static str),
  #[error("no task '{task_key}' found for user {telegram_id}")]
  NotFound { telegram_id: String, task_key: String },
  #[error("task store failure: {0}")]
  Backend(String),
}

/// Where the webhook records a user's task status.
#[async_trait]
pub trait TaskStore: Send + Sync {
  /// Marks the event's task for the event's user with the event's status.
  async fn mark_task(&self, event: &TaskUpdateEvent) -> Result<(), StorageError>;
}

pub fn build_store(backend: StoreBackend) -> Arc<dyn TaskStore> {
  match backend {
    StoreBackend::Noop => Arc::new(NoopTaskStore),
    StoreBackend::Memory => Arc::new(InMemoryTaskStore::new()),
  }
}

/// Accepts every update without recording it.
#[derive(Debug, Clone, Default)]
pub struct NoopTaskStore;

#[async_trait]
impl TaskStore for NoopTaskStore {
  async fn mark_task(&self, event: &TaskUpdateEvent) -> Result<(), StorageError> {
    debug!(
      telegram_id = ?event.telegram_id_key(),
      task_key = ?event.task_key_str(),
      "Noop: skipping task store update"
    );
    Ok(())
  }
}

/// Rows must be registered before they can be updated, like the
/// `user_tasks` table the bot's backend keeps.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
  rows: RwLock<HashMap<(String, String), TaskRecord>>,
}

impl InMemoryTaskStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn register(&self, telegram_id: impl Into<String>, task_key: impl Into<String>) {
    let telegram_id = telegram_id.into();
    let task_key = task_key.into();
    let record = TaskRecord {
      telegram_id: telegram_id.clone(),
      task_key: task_key.clone(),
      status: None,
      meta: None,
      updated_at: None,
    };
    self.rows.write().await.insert((telegram_id, task_key), record);
  }

  pub async fn get(&self, telegram_id: &str, task_key: &str) -> Option<TaskRecord> {
    self.rows
      .read()
      .await
      .get(&(telegram_id.to_string(), task_key.to_string()))
      .cloned()
  }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
  async fn mark_task(&self, event: &TaskUpdateEvent) -> Result<(), StorageError> {
    let telegram_id = event.telegram_id_key().ok_or(StorageError::MissingField("telegramId"))?;
    let task_key = event.task_key_str().ok_or(StorageError::MissingField("taskKey"))?;
    let status = event.status_str().ok_or(StorageError::MissingField("status"))?;

    let mut rows = self.rows.write().await;
    let record = rows
      .get_mut(&(telegram_id.clone(), task_key.clone()))
      .ok_or(StorageError::NotFound { telegram_id, task_key })?;
    record.status = Some(status);
    record.meta = event.meta.clone();
    record.updated_at = Some(Utc::now());
    info!(telegram_id = %record.telegram_id, task_key = %record.task_key, "Task record updated");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn noop_store_accepts_anything() {
    assert!(NoopTaskStore.mark_task(&TaskUpdateEvent::default()).await.is_ok());
  }

  #[tokio::test]
  async fn memory_store_updates_registered_row() {
    let store = InMemoryTaskStore::new();
    store.register("123", "daily_login").await;

    let event = TaskUpdateEvent::new(123, "daily_login", "completed", Some(json!({"streak": 5})));
    store.mark_task(&event).await.unwrap();

    let row = store.get("123", "daily_login").await.unwrap();
    assert_eq!(row.status.as_deref(), Some("completed"));
    assert_eq!(row.meta, Some(json!({"streak": 5})));
    assert!(row.updated_at.is_some());
  }

  #[tokio::test]
  async fn memory_store_reports_unknown_target() {
    let store = InMemoryTaskStore::new();
    let event = TaskUpdateEvent::new(7, "missing_task", "completed", None);
    let err = store.mark_task(&event).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { ref telegram_id, ref task_key }
      if telegram_id == "7" && task_key == "missing_task"));
    assert_eq!(err.to_string(), "no task 'missing_task' found for user 7");
  }

  #[tokio::test]
  async fn memory_store_requires_identifiers() {
    let store = InMemoryTaskStore::new();
    let event = TaskUpdateEvent { task_key: Some(json!("daily_login")), ..Default::default() };
    assert!(matches!(
      store.mark_task(&event).await,
      Err(StorageError::MissingField("telegramId"))
    ));
  }

  #[test]
  fn builds_requested_backend() {
    let _noop = build_store(StoreBackend::Noop);
    let _memory = build_store(StoreBackend::Memory);
  }
}
