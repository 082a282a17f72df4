// core/src/error.rs

use serde_json::json;
use thiserror::Error;

use crate::event::FunctionResponse;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";
pub const REQUIRED_FIELDS_MISSING: &str = "Name, price and category are required";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("Method not allowed")]
  MethodNotAllowed { method: String },

  #[error("invalid input syntax for product id: \"{0}\"")]
  InvalidId(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Sqlx(#[from] sqlx::Error),

  #[error("{0}")]
  Internal(String),
}

impl AppError {
  pub fn product_not_found() -> Self {
    AppError::NotFound(PRODUCT_NOT_FOUND.to_string())
  }

  pub fn product_id_required() -> Self {
    AppError::Validation(PRODUCT_ID_REQUIRED.to_string())
  }

  pub fn required_fields_missing() -> Self {
    AppError::Validation(REQUIRED_FIELDS_MISSING.to_string())
  }

  pub fn status_code(&self) -> u16 {
    match self {
      AppError::Validation(_) => 400,
      AppError::NotFound(_) => 404,
      AppError::MethodNotAllowed { .. } => 405,
      AppError::InvalidId(_)
      | AppError::Config(_)
      | AppError::Json(_)
      | AppError::Sqlx(_)
      | AppError::Internal(_) => 500,
    }
  }

  /// Turns the error into the response envelope sent back to the caller.
  ///
  /// Every variant becomes `{"error": <message>}`. Server-side failures are
  /// surfaced verbatim; the function is an admin-facing tool.
  pub fn into_response(self) -> FunctionResponse {
    let status = self.status_code();
    if status >= 500 {
      tracing::error!(application_error = %self, status, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status, "Responding with client error");
    }
    FunctionResponse::from_json_value(status, &json!({ "error": self.to_string() }))
  }
}

impl From<AppError> for FunctionResponse {
  fn from(err: AppError) -> Self {
    err.into_response()
  }
}

// Define a Result type alias for the crate
pub type Result<T, E = AppError> = std::result::Result<T, E>;
