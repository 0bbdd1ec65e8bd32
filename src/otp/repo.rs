use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::code::{NewVerificationCode, VerificationCode};

/// Shared store of issued codes.
#[async_trait]
pub trait CodeStore: Send + Sync {
    async fn insert(&self, code: NewVerificationCode) -> anyhow::Result<VerificationCode>;

    /// Newest unused, unexpired row matching both `email` and `code`.
    async fn find_valid(
        &self,
        email: &str,
        code: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<VerificationCode>>;

    /// Flips `used` on row `id` only if it is still unused.
    /// Returns false when another caller already consumed it.
    async fn mark_used(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgCodeStore {
    db: PgPool,
}

impl PgCodeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CodeStore for PgCodeStore {
    async fn insert(&self, code: NewVerificationCode) -> anyhow::Result<VerificationCode> {
        let row = sqlx::query_as::<_, VerificationCode>(
            r#"
            INSERT INTO verification_codes (email, otp_code, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, otp_code, expires_at, used, created_at
            "#,
        )
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.expires_at)
        .bind(code.created_at)
        .fetch_one(&self.db)
        .await
        .context("insert verification code")?;
        Ok(row)
    }

    async fn find_valid(
        &self,
        email: &str,
        code: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<VerificationCode>> {
        let row = sqlx::query_as::<_, VerificationCode>(
            r#"
            SELECT id, email, otp_code, expires_at, used, created_at
              FROM verification_codes
             WHERE email = $1
               AND otp_code = $2
               AND used = false
               AND expires_at > $3
             ORDER BY created_at DESC
             LIMIT 1
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(now)
        .fetch_optional(&self.db)
        .await
        .context("find verification code")?;
        Ok(row)
    }

    async fn mark_used(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE verification_codes
               SET used = true
             WHERE id = $1 AND used = false
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await
        .context("mark verification code used")?;
        Ok(res.rows_affected() == 1)
    }
}
