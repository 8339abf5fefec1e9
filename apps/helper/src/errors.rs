use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::browser::BrowserError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::Browser(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Browser(_) => "BROWSER_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text safe to show the user. Internal failures are replaced by a
    /// generic message; their details only go to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn log(&self) {
        match self {
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::Llm(msg) => tracing::error!("LLM error: {msg}"),
            AppError::Browser(msg) => tracing::error!("Browser error: {msg}"),
            _ => tracing::debug!("Request rejected: {self}"),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl From<BrowserError> for AppError {
    fn from(e: BrowserError) -> Self {
        AppError::Browser(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (self.status(), body).into_response()
    }
}
