use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{LoginRequest, RefreshRequest, SessionResponse};
use super::tokens::{SessionKeys, SessionUser, TokenKind};
use crate::{
    accounts::{normalize_email, password, Account, PublicUser},
    error::{json_body, AppError},
    state::AppState,
};

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue_pair(state: &AppState, account: Account) -> Result<SessionResponse, AppError> {
    let keys = SessionKeys::from_ref(state);
    let now = OffsetDateTime::now_utc();
    let access_token = keys
        .issue(&account, TokenKind::Access, now)
        .map_err(AppError::Internal)?;
    let refresh_token = keys
        .issue(&account, TokenKind::Refresh, now)
        .map_err(AppError::Internal)?;
    Ok(SessionResponse {
        access_token,
        refresh_token,
        user: account.into(),
    })
}

async fn load_account(state: &AppState, id: Uuid) -> Result<Account, AppError> {
    state
        .accounts
        .find_by_id(id)
        .await
        .map_err(AppError::Storage)?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let payload = json_body(payload, AppError::BadRequest)?;
    let email = normalize_email(&payload.email);

    let account = state
        .accounts
        .find_by_email(&email)
        .await
        .map_err(AppError::Storage)?;
    let ok = password::matches(account.as_ref(), &payload.password).map_err(AppError::Internal)?;

    let account = match account {
        Some(a) if ok => a,
        Some(a) => {
            warn!(email = %email, user_id = %a.id, "login invalid password");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    if account.email_confirmed_at.is_none() {
        warn!(user_id = %account.id, "login with unconfirmed email");
        return Err(AppError::Unauthorized("Email not confirmed".into()));
    }

    info!(user_id = %account.id, email = %account.email, "user logged in");
    Ok(Json(issue_pair(&state, account)?))
}

/// Trades a refresh token for a new pair, re-reading the account so deleted
/// or unconfirmed accounts lose their session.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let payload = json_body(payload, AppError::BadRequest)?;
    let claims = SessionKeys::from_ref(&state)
        .open(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|e| {
            warn!(reason = %e, "refresh token refused");
            AppError::from(e)
        })?;

    let account = load_account(&state, claims.sub).await?;
    if account.email_confirmed_at.is_none() {
        warn!(user_id = %account.id, "refresh for unconfirmed email");
        return Err(AppError::Unauthorized("Email not confirmed".into()));
    }

    info!(user_id = %account.id, "session refreshed");
    Ok(Json(issue_pair(&state, account)?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<PublicUser>, AppError> {
    let account = load_account(&state, user.id).await?;
    Ok(Json(account.into()))
}
