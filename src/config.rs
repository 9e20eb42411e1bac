use std::env;
use anyhow::{anyhow, Context, Result};

pub const DEFAULT_WEBHOOK_PATH: &str = "/telegram-task-update";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Noop,
  Memory,
}

/// Server settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
  /// `None` when unset or empty. No request secret ever matches `None`.
  pub webhook_secret: Option<String>,
  pub webhook_path: String,
  pub server_port: u16,
  pub expose_error_details: bool,
  pub store_backend: StoreBackend,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let server_port = match lookup("SERVER_PORT") {
      Some(raw) => raw
        .trim()
        .parse()
        .with_context(|| format!("SERVER_PORT is not a valid port: {raw:?}"))?,
      None => DEFAULT_PORT,
    };

    let expose_error_details = match lookup("WEBHOOK_EXPOSE_ERROR_DETAILS") {
      Some(raw) => parse_bool(&raw)
        .ok_or_else(|| anyhow!("WEBHOOK_EXPOSE_ERROR_DETAILS must be true or false, got {raw:?}"))?,
      None => true,
    };

    let store_backend = match lookup("TASK_STORE").as_deref().map(str::trim) {
      None | Some("") | Some("noop") => StoreBackend::Noop,
      Some("memory") => StoreBackend::Memory,
      Some(other) => return Err(anyhow!("unknown TASK_STORE backend {other:?}")),
    };

    Ok(Self {
      webhook_secret: non_empty(lookup("TELEGRAM_WEBHOOK_SECRET")),
      webhook_path: normalize_path(lookup("WEBHOOK_PATH").as_deref()),
      server_port,
      expose_error_details,
      store_backend,
    })
  }

  /// Config for in-process use and tests: default path, details exposed.
  pub fn with_secret(secret: impl Into<String>) -> Self {
    Self {
      webhook_secret: non_empty(Some(secret.into())),
      webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
      server_port: DEFAULT_PORT,
      expose_error_details: true,
      store_backend: StoreBackend::Noop,
    }
  }
}

/// Bot-side settings for pushing task updates to the webhook.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
  pub webhook_url: Option<String>,
  pub webhook_secret: Option<String>,
}

impl NotifierConfig {
  pub fn from_env() -> Self {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    Self {
      webhook_url: non_empty(lookup("TASK_WEBHOOK_URL")),
      webhook_secret: non_empty(lookup("TASK_WEBHOOK_SECRET")),
    }
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Some(true),
    "0" | "false" | "no" | "off" => Some(false),
    _ => None,
  }
}

fn normalize_path(raw: Option<&str>) -> String {
  let trimmed = raw.map(|p| p.trim().trim_end_matches('/')).unwrap_or("");
  if trimmed.is_empty() {
    DEFAULT_WEBHOOK_PATH.to_string()
  } else if trimmed.starts_with('/') {
    trimmed.to_string()
  } else {
    format!("/{trimmed}")
  }
}
