use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Account, NewAccount};

/// Persistence for provisioned accounts. Email is unique.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: NewAccount) -> anyhow::Result<Account>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Account>>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, account: NewAccount) -> anyhow::Result<Account> {
        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (email, password_hash, full_name, email_confirmed_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, email_confirmed_at, created_at
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(account.email_confirmed_at)
        .fetch_one(&self.db)
        .await;

        match created {
            Ok(a) => Ok(a),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                anyhow::bail!("email already registered")
            }
            Err(e) => Err(e).context("insert user"),
        }
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, full_name, email_confirmed_at, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, full_name, email_confirmed_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(account)
    }
}
