use anyhow::{anyhow, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tg_task_webhook::{
  config::NotifierConfig,
  models::TaskUpdateEvent,
  notifier::TaskNotifier,
  telemetry::init_tracing,
};

/// Push a task status update to the task webhook.
#[derive(Debug, Parser)]
#[command(name = "tg_task_notify", version, about)]
struct Args {
  /// Telegram user id.
  #[arg(long)]
  telegram_id: i64,

  /// Task key, e.g. `tg_referral_5`.
  #[arg(long)]
  task_key: String,

  #[arg(long, default_value = "completed")]
  status: String,

  /// Extra metadata as a JSON document.
  #[arg(long, value_parser = parse_meta)]
  meta: Option<Value>,

  #[arg(long, env = "TASK_WEBHOOK_URL")]
  url: Option<String>,

  #[arg(long, env = "TASK_WEBHOOK_SECRET", hide_env_values = true)]
  secret: Option<String>,
}

fn parse_meta(raw: &str) -> Result<Value, String> {
  serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
  init_tracing();
  let args = Args::parse();

  let config = NotifierConfig::from_lookup(|key| match key {
    "TASK_WEBHOOK_URL" => args.url.clone(),
    "TASK_WEBHOOK_SECRET" => args.secret.clone(),
    _ => None,
  });
  let Some(notifier) = TaskNotifier::from_config(&config) else {
    return Err(anyhow!("set --url/TASK_WEBHOOK_URL and --secret/TASK_WEBHOOK_SECRET"));
  };

  let event = TaskUpdateEvent::new(args.telegram_id, args.task_key, args.status, args.meta);
  let status = notifier.send(&event).await?;
  info!("Webhook answered {}", status);
  Ok(())
}
