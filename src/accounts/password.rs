//! Argon2 password digests for provisioned accounts.

use std::sync::OnceLock;

use anyhow::{anyhow, Context};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use super::Account;

/// PHC-formatted Argon2id digest of `password`, salted from the OS RNG.
pub fn digest(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow!("argon2: {e}"))
}

/// Stand-in digest checked when a login names no account.
fn decoy() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| digest("chefscircle-decoy-password").ok())
        .as_deref()
}

/// Computes the decoy up front so the first unknown-email login costs the
/// same as later ones.
pub fn warm_up() {
    let _ = decoy();
}

/// Whether `password` opens `account`.
///
/// A missing account never matches but still pays for one Argon2
/// verification, so response time does not reveal which emails exist.
pub fn matches(account: Option<&Account>, password: &str) -> anyhow::Result<bool> {
    let Some(account) = account else {
        if let Some(decoy) = decoy() {
            let _ = check(password, decoy);
        }
        return Ok(false);
    };
    check(password, &account.password_hash)
        .with_context(|| format!("stored digest for account {} is unreadable", account.id))
}

fn check(password: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("argon2: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
