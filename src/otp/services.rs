use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use super::code::{NewVerificationCode, VerificationCode};
use super::dto::{SendOtp, VerifyOtp};
use crate::accounts::{self, Account, Signup};
use crate::error::AppError;
use crate::mail::otp_email;
use crate::state::AppState;

/// Persists a fresh code for `cmd.email` and emails it.
///
/// The row is written before delivery and stays in place if delivery fails;
/// a retry issues a new row rather than resending this one.
pub async fn issue_code(
    state: &AppState,
    cmd: SendOtp,
    now: OffsetDateTime,
) -> Result<VerificationCode, AppError> {
    let ttl_minutes = state.config.otp.ttl_minutes;
    let new = NewVerificationCode::issue(&cmd.email, now, Duration::minutes(ttl_minutes));

    let row = state.codes.insert(new).await.map_err(AppError::Storage)?;
    info!(email = %row.email, code_id = %row.id, expires_at = %row.expires_at, "otp issued");

    let message = otp_email(&row.email, &row.code, ttl_minutes);
    state
        .mailer
        .send(&message)
        .await
        .map_err(AppError::Delivery)?;
    info!(email = %row.email, code_id = %row.id, "otp email sent");

    Ok(row)
}

/// Consumes a matching code and provisions a pre-confirmed account.
///
/// Once the code is flipped to used it is never restored, even if account
/// creation fails afterwards.
pub async fn verify_and_provision(
    state: &AppState,
    cmd: VerifyOtp,
    now: OffsetDateTime,
) -> Result<Account, AppError> {
    let row = state
        .codes
        .find_valid(&cmd.email, &cmd.otp, now)
        .await
        .map_err(AppError::Storage)?
        .ok_or(AppError::InvalidOrExpiredCode)?;
    if !row.accepts(&cmd.email, &cmd.otp, now) {
        return Err(AppError::InvalidOrExpiredCode);
    }

    let claimed = state
        .codes
        .mark_used(row.id)
        .await
        .map_err(AppError::Storage)?;
    if !claimed {
        warn!(email = %cmd.email, code_id = %row.id, "otp consumed concurrently");
        return Err(AppError::InvalidOrExpiredCode);
    }
    info!(email = %cmd.email, code_id = %row.id, "otp consumed");

    let signup = Signup {
        email: cmd.email,
        password: cmd.password,
        full_name: cmd.full_name,
        confirmed_at: now,
    };
    accounts::provision(state.accounts.as_ref(), signup)
        .await
        .map_err(AppError::AccountCreation)
}
