// kasse/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KasseError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No checkout token is available for this session")]
  MissingCheckoutToken,

  #[error("Line mismatch: editor is bound to line '{expected}', received '{actual}'")]
  LineMismatch { expected: String, actual: String },

  #[error("Commerce API transport failed during '{operation}'. Source: {source}")]
  Transport {
    operation: &'static str,
    #[source]
    source: reqwest::Error,
  },

  #[error("Commerce API returned GraphQL errors for '{operation}': {}", messages.join("; "))]
  GraphQl {
    operation: &'static str,
    messages: Vec<String>,
  },

  #[error("Could not decode commerce API response for '{operation}'. Source: {source}")]
  Decode {
    operation: &'static str,
    #[source]
    source: serde_json::Error,
  },

  #[error("Error in a flow handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error: {0}")]
  Configuration(String),

  #[error("Internal kasse error: {0}")]
  Internal(String),
}

impl KasseError {
  /// Whether the failure happened before any answer came back from the API.
  pub fn is_transport(&self) -> bool {
    matches!(self, KasseError::Transport { .. })
  }
}

impl From<AnyhowError> for KasseError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a KasseError that was boxed into anyhow on the way up,
    // otherwise keep the whole chain as a handler error.
    match err.downcast::<KasseError>() {
      Ok(kasse_err) => kasse_err,
      Err(err) => KasseError::HandlerError { source: err },
    }
  }
}

pub type KasseResult<T, E = KasseError> = std::result::Result<T, E>;
