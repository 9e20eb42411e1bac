use std::sync::Arc;
use anyhow::{Context, Result};
use tracing::{info, warn};
use tg_task_webhook::{config::Config, routes::routes, store::build_store, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
  init_tracing();
  let config = Config::from_env()?;
  if config.webhook_secret.is_none() {
    warn!("TELEGRAM_WEBHOOK_SECRET is not set; every task update will be rejected");
  }

  let store = build_store(config.store_backend);
  let port = config.server_port;
  info!(path = %config.webhook_path, store = ?config.store_backend, "Task update webhook is up and running on port {}", port);

  let api = routes(Arc::new(config), store);
  let (_, server) = warp::serve(api)
    .try_bind_with_graceful_shutdown(([0, 0, 0, 0], port), async {
      let _ = tokio::signal::ctrl_c().await;
      info!("Shutdown signal received");
    })
    .with_context(|| format!("failed to bind port {port}"))?;
  server.await;
  Ok(())
}
