use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Too late to cancel: {0}")]
    TooLateToCancel(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TooLateToCancel(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidSelection(_) => "INVALID_SELECTION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::TooLateToCancel(_) => "TOO_LATE_TO_CANCEL",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            // Business-rule rejections are normal outcomes, not faults.
            AppError::InvalidSelection(msg)
            | AppError::NotFound(msg)
            | AppError::TooLateToCancel(msg) => {
                warn!(error = ?self, message = %msg, "Request refused");
            }
            AppError::Internal(msg) => {
                error!(error = ?self, message = %msg, "Internal error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Domain rejections are surfaced verbatim; internal details are not.
        let public_message = match &self {
            AppError::InvalidSelection(msg)
            | AppError::NotFound(msg)
            | AppError::TooLateToCancel(msg) => msg.clone(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}
