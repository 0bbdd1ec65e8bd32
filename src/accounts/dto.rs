use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Account;

#[derive(Debug, Serialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
}

/// Public part of the account returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub user_metadata: UserMetadata,
    #[serde(with = "time::serde::rfc3339::option")]
    pub email_confirmed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for PublicUser {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            user_metadata: UserMetadata {
                full_name: a.full_name,
            },
            email_confirmed_at: a.email_confirmed_at,
            created_at: a.created_at,
        }
    }
}
