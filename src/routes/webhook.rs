use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;
use warp::http::{HeaderMap, Method};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::reply::{self, Reply, Response};
use tracing::{info, warn, error};
use crate::config::Config;
use crate::error::WebhookError;
use crate::models::{display_field, AckResponse, TaskUpdateEvent};
use crate::store::TaskStore;

pub const SECRET_HEADER: &str = "x-bot-secret";

/// Every method reaches the handler so the method gate decides on 405.
pub fn task_update_route(
  config: Arc<Config>,
  store: Arc<dyn TaskStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  exact_path(config.webhook_path.clone())
    .and(warp::method())
    .and(warp::header::headers_cloned())
    .and(warp::body::bytes())
    .and(with_config(config))
    .and(with_store(store))
    .and_then(handle_task_update)
}

fn exact_path(expected: String) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
  let expected: Arc<str> = expected.into();
  warp::path::full()
    .and_then(move |path: FullPath| {
      let expected = expected.clone();
      async move {
        if path.as_str() == &*expected {
          Ok(())
        } else {
          Err(warp::reject::not_found())
        }
      }
    })
    .untuple_one()
}

fn with_config(config: Arc<Config>) -> impl Filter<Extract = (Arc<Config>,), Error = Infallible> + Clone {
  warp::any().map(move || config.clone())
}

fn with_store(store: Arc<dyn TaskStore>) -> impl Filter<Extract = (Arc<dyn TaskStore>,), Error = Infallible> + Clone {
  warp::any().map(move || store.clone())
}

async fn handle_task_update(
  method: Method,
  headers: HeaderMap,
  body: Bytes,
  config: Arc<Config>,
  store: Arc<dyn TaskStore>,
) -> Result<Response, Infallible> {
  let response = match process(&method, &headers, &body, &config, store.as_ref()).await {
    Ok(()) => reply::json(&AckResponse { message: "Update received successfully" }).into_response(),
    Err(e) => e.into_response(config.expose_error_details),
  };
  Ok(response)
}

async fn process(
  method: &Method,
  headers: &HeaderMap,
  body: &[u8],
  config: &Config,
  store: &dyn TaskStore,
) -> Result<(), WebhookError> {
  if *method != Method::POST {
    return Err(WebhookError::MethodNotAllowed);
  }

  let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
  if !secret_matches(config.webhook_secret.as_deref(), provided) {
    warn!("Unauthorized request: invalid secret received");
    return Err(WebhookError::Unauthorized);
  }

  apply_update(body, store).await.inspect_err(|e| {
    error!("Error processing request: {}", e);
  })
}

/// Plain equality; an unconfigured secret matches nothing.
fn secret_matches(expected: Option<&str>, provided: Option<&str>) -> bool {
  match (expected, provided) {
    (Some(expected), Some(provided)) => expected == provided,
    _ => false,
  }
}

async fn apply_update(body: &[u8], store: &dyn TaskStore) -> Result<(), WebhookError> {
  let event = TaskUpdateEvent::from_json(body)?;

  info!("Received task update for user {}", display_field(&event.telegram_id));
  info!("  Task: {}, Status: {}", display_field(&event.task_key), display_field(&event.status));
  info!("  Metadata: {}", display_field(&event.meta));

  store.mark_task(&event).await?;
  Ok(())
}
