use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::info;
use crate::config::NotifierConfig;
use crate::models::{display_field, TaskUpdateEvent};
use crate::routes::webhook::SECRET_HEADER;

/// Bot-side client that pushes task updates to the webhook.
#[derive(Debug, Clone)]
pub struct TaskNotifier {
  client: Client,
  webhook_url: String,
  webhook_secret: String,
}

impl TaskNotifier {
  /// `None` when the URL or the secret is not configured; callers skip the
  /// update in that case.
  pub fn from_config(config: &NotifierConfig) -> Option<Self> {
    match (&config.webhook_url, &config.webhook_secret) {
      (Some(url), Some(secret)) => Some(Self::new(Client::new(), url.clone(), secret.clone())),
      _ => {
        info!("Task webhook URL or secret not configured. Skipping updates.");
        None
      }
    }
  }

  pub fn new(client: Client, webhook_url: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
    Self {
      client,
      webhook_url: webhook_url.into(),
      webhook_secret: webhook_secret.into(),
    }
  }

  pub async fn send(&self, event: &TaskUpdateEvent) -> Result<StatusCode> {
    let user = display_field(&event.telegram_id);
    let response = self.client
      .post(&self.webhook_url)
      .header(SECRET_HEADER, &self.webhook_secret)
      .json(event)
      .send()
      .await
      .with_context(|| format!("failed to send task update for user {user}"))?
      .error_for_status()
      .with_context(|| format!("task webhook rejected update for user {user}"))?;

    let status = response.status();
    info!("Successfully sent task update for user {}. Status: {}", user, status);
    Ok(status)
  }
}
