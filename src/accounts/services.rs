use anyhow::Context;
use time::OffsetDateTime;
use tracing::info;

use super::{password, Account, AccountStore, NewAccount};

/// A sign-up whose email has already been proven.
pub struct Signup {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub confirmed_at: OffsetDateTime,
}

/// Digests the password and creates a pre-confirmed account.
pub async fn provision(store: &dyn AccountStore, signup: Signup) -> anyhow::Result<Account> {
    let password_hash = password::digest(&signup.password)
        .with_context(|| format!("hash password for {}", signup.email))?;

    let account = store
        .create(NewAccount {
            email: signup.email.clone(),
            password_hash,
            full_name: signup.full_name,
            email_confirmed_at: Some(signup.confirmed_at),
        })
        .await
        .with_context(|| format!("create account for {}", signup.email))?;

    info!(user_id = %account.id, email = %account.email, "account provisioned");
    Ok(account)
}
