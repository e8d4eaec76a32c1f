// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use kasse::KasseError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Commerce API Error: {source}")]
  Commerce {
    #[from]
    source: KasseError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<KasseError>() {
      Ok(source) => AppError::Commerce { source },
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Commerce { source } => match source {
        KasseError::Transport { .. } | KasseError::GraphQl { .. } | KasseError::Decode { .. } => {
          HttpResponse::BadGateway().json(json!({"error": "Commerce backend unavailable", "detail": source.to_string()}))
        }
        KasseError::MissingCheckoutToken => HttpResponse::NotFound().json(json!({"error": "No checkout for this session"})),
        KasseError::LineMismatch { .. } => HttpResponse::Conflict().json(json!({"error": source.to_string()})),
        _ => {
          tracing::error!(kasse_error_source = ?source, "Cart engine error details");
          HttpResponse::InternalServerError()
            .json(json!({"error": "Cart processing error", "detail": source.to_string()}))
        }
      },
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
