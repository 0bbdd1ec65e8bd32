use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::dto::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
use super::services::{issue_code, verify_and_provision};
use crate::{
    error::{json_body, AppError},
    state::AppState,
};

pub fn otp_routes() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(send_otp).options(preflight))
        .route("/verify-otp", post(verify_otp).options(preflight))
}

/// Plain `OPTIONS` without preflight headers still gets an empty 200.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[instrument(skip(state, payload))]
pub async fn send_otp(
    State(state): State<AppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<SendOtpResponse>, AppError> {
    let cmd = json_body(payload, AppError::Validation)?.validate()?;
    issue_code(&state, cmd, OffsetDateTime::now_utc()).await?;
    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    let cmd = json_body(payload, AppError::Validation)?.validate(state.config.password_min_length)?;
    let account = verify_and_provision(&state, cmd, OffsetDateTime::now_utc()).await?;
    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "Account created successfully".into(),
        user: account.into(),
    }))
}
