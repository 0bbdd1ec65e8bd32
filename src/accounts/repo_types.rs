use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,                    // Argon2 PHC string, never serialized
    pub full_name: Option<String>,                // profile metadata
    pub email_confirmed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Fields needed to provision an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub email_confirmed_at: Option<OffsetDateTime>,
}
