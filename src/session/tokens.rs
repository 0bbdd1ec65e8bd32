//! Signed session tokens handed out by login and refresh.

use std::fmt;

use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{accounts::Account, config::JwtConfig, error::AppError, state::AppState};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Access => "Access",
            TokenKind::Refresh => "Refresh",
        })
    }
}

/// Claims shared by both token kinds. `email_verified` reflects the account's
/// `email_confirmed_at` when the token was signed.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub email_verified: bool,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Why a presented token was refused. The display text is the client message.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("{0} token required")]
    WrongKind(TokenKind),

    #[error("Invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl From<&JwtConfig> for SessionKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.ttl_minutes.max(0)),
            refresh_ttl: Duration::minutes(cfg.refresh_ttl_minutes.max(0)),
        }
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::from(&state.config.jwt)
    }
}

impl SessionKeys {
    pub fn issue(
        &self,
        account: &Account,
        kind: TokenKind,
        now: OffsetDateTime,
    ) -> anyhow::Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = SessionClaims {
            sub: account.id,
            email: account.email.clone(),
            email_verified: account.email_confirmed_at.is_some(),
            kind,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .with_context(|| format!("sign {kind} token for {}", account.id))?;
        debug!(user_id = %account.id, kind = %kind, "session token signed");
        Ok(token)
    }

    /// Verifies signature, issuer, audience and expiry, then the token kind.
    pub fn open(&self, token: &str, expected: TokenKind) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        let claims = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })?
            .claims;
        if claims.kind != expected {
            return Err(TokenError::WrongKind(expected));
        }
        Ok(claims)
    }
}

/// Caller authenticated by a bearer access token for a confirmed email.
#[derive(Debug)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

fn bearer(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer(parts)?;
        let claims = SessionKeys::from_ref(state)
            .open(token, TokenKind::Access)
            .map_err(|e| {
                warn!(reason = %e, "access token refused");
                AppError::from(e)
            })?;

        if !claims.email_verified {
            warn!(user_id = %claims.sub, "access token for unconfirmed email");
            return Err(AppError::Unauthorized("Email not confirmed".into()));
        }

        Ok(SessionUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
