use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};
use crate::models::ErrorResponse;
use crate::store::StorageError;

#[derive(Debug, Error)]
pub enum WebhookError {
  #[error("Method Not Allowed")]
  MethodNotAllowed,
  #[error("Unauthorized")]
  Unauthorized,
  #[error("{0}")]
  MalformedRequest(#[from] serde_json::Error),
  #[error("{0}")]
  Storage(#[from] StorageError),
  #[error("{0}")]
  Internal(String),
}

impl WebhookError {
  pub fn status(&self) -> StatusCode {
    match self {
      WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      WebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
      WebhookError::MalformedRequest(_) | WebhookError::Storage(_) | WebhookError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  /// 405 and 401 are plain text; everything else is the JSON error body,
  /// with `details` only when `expose_details` is set.
  pub fn into_response(self, expose_details: bool) -> Response {
    match self {
      WebhookError::MethodNotAllowed => {
        reply::with_status("Method Not Allowed", StatusCode::METHOD_NOT_ALLOWED).into_response()
      }
      WebhookError::Unauthorized => {
        reply::with_status("Unauthorized", StatusCode::UNAUTHORIZED).into_response()
      }
      other => {
        let body = ErrorResponse {
          error: "Internal Server Error",
          details: expose_details.then(|| other.to_string()),
        };
        reply::with_status(reply::json(&body), other.status()).into_response()
      }
    }
  }
}
