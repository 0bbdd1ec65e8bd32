use crate::accounts::{password, AccountStore, PgAccountStore};
use crate::config::AppConfig;
use crate::mail::{self, Mailer};
use crate::otp::repo::{CodeStore, PgCodeStore};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Everything a handler needs, injected per request through axum state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codes: Arc<dyn CodeStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        password::warm_up();
        let mailer = mail::from_config(&config.email);

        Ok(Self::from_parts(
            config,
            Arc::new(PgCodeStore::new(db.clone())),
            Arc::new(PgAccountStore::new(db)),
            mailer,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        codes: Arc<dyn CodeStore>,
        accounts: Arc<dyn AccountStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            codes,
            accounts,
            mailer,
        }
    }
}
