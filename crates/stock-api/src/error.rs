//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stock_core::DomainError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the domain failure it carries, if any.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + DomainError + Send + Sync + 'static,
  {
    if let Some(domain) = e.domain() {
      return Self::from_domain(domain);
    }
    ApiError::Internal(Box::new(e))
  }

  fn from_domain(e: &stock_core::Error) -> Self {
    use stock_core::Error as E;
    match e {
      E::ProductNotFound(_) => ApiError::NotFound(e.to_string()),
      E::Conflict { .. } => ApiError::Conflict(e.to_string()),
      _ if e.is_validation() => ApiError::BadRequest(e.to_string()),
      _ => ApiError::Internal(e.to_string().into()),
    }
  }
}

impl From<stock_core::Error> for ApiError {
  fn from(e: stock_core::Error) -> Self { Self::from_domain(&e) }
}

impl From<stock_order::Error> for ApiError {
  fn from(e: stock_order::Error) -> Self {
    match e {
      stock_order::Error::TemplateNotFound(_) => ApiError::NotFound(e.to_string()),
      other => ApiError::Internal(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Internal(e) => {
        tracing::warn!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn domain_errors_map_to_status() {
    let cases = [
      (stock_core::Error::EmptyName, StatusCode::BAD_REQUEST),
      (stock_core::Error::InvalidLocation("garage".into()), StatusCode::BAD_REQUEST),
      (stock_core::Error::ProductNotFound(4), StatusCode::NOT_FOUND),
      (
        stock_core::Error::Conflict { name: "Sodium".into(), location: "box".into() },
        StatusCode::CONFLICT,
      ),
    ];
    for (error, status) in cases {
      assert_eq!(ApiError::from(error).into_response().status(), status);
    }
  }

  #[test]
  fn missing_template_is_not_found() {
    let e = stock_order::Error::TemplateNotFound("BON_COMMANDE.docx".into());
    assert_eq!(ApiError::from(e).into_response().status(), StatusCode::NOT_FOUND);

    let e = stock_order::Error::MissingPart("word/document.xml");
    assert_eq!(
      ApiError::from(e).into_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}
