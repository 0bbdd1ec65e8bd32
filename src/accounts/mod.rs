pub mod dto;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use dto::PublicUser;
pub use repo::{AccountStore, PgAccountStore};
pub use repo_types::{Account, NewAccount};
pub use services::{provision, Signup};

/// Emails are stored and compared trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
