//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error(transparent)]
  Core(#[from] homeward_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"homeward\""),
        );
        res
      }
      ApiError::Core(err) => {
        let status = match &err {
          e if e.is_not_found() => StatusCode::NOT_FOUND,
          homeward_core::Error::Forbidden(_) => StatusCode::FORBIDDEN,
          homeward_core::Error::InvalidState(_) => StatusCode::CONFLICT,
          _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": err.to_string() }))).into_response()
      }
    }
  }
}
