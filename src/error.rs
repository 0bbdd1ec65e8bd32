use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Every failure a handler can surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("storage failure")]
    Storage(#[source] anyhow::Error),

    #[error("email delivery failure")]
    Delivery(#[source] anyhow::Error),

    #[error("Invalid or expired OTP")]
    InvalidOrExpiredCode,

    #[error("account creation failure")]
    AccountCreation(#[source] anyhow::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// Message shown to the caller. Internal causes never leak.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) | AppError::Unauthorized(msg) => {
                msg.clone()
            }
            AppError::InvalidOrExpiredCode => self.to_string(),
            AppError::Storage(_) | AppError::Internal(_) => "Internal server error".into(),
            AppError::Delivery(_) => "Failed to send verification email".into(),
            AppError::AccountCreation(_) => "Failed to create account".into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                warn!(reason = %msg, "request rejected")
            }
            AppError::InvalidOrExpiredCode => warn!("no eligible verification code"),
            AppError::Unauthorized(msg) => warn!(reason = %msg, "unauthorized"),
            AppError::Storage(e) => error!(error = ?e, "storage error"),
            AppError::Delivery(e) => error!(error = ?e, "email delivery error"),
            AppError::AccountCreation(e) => error!(error = ?e, "account creation error"),
            AppError::Internal(e) => error!(error = ?e, "internal error"),
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Unwraps a JSON body, turning axum's plain-text rejection into `reject`.
pub fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    reject: fn(String) -> AppError,
) -> Result<T, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| reject(format!("Invalid request body: {}", e.body_text())))
}

/// Response for a panicking handler, installed through `CatchPanicLayer`.
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("handler panicked");
    let body = ErrorBody {
        error: "Internal server error".into(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
