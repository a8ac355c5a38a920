use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::{
    jwt::JwtKeys,
    password::Argon2Hasher,
    policy::PasswordPolicy,
    repo::PgCredentialStore,
    store::CredentialStore,
    AuthService,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub keys: Arc<JwtKeys>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        let store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db.clone()));

        Self::from_parts(db, config, store)
    }

    /// Wires the auth service from explicit parts; tests pass an in-memory store.
    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        store: Arc<dyn CredentialStore>,
    ) -> anyhow::Result<Self> {
        let keys = Arc::new(JwtKeys::from_config(&config.jwt));
        let auth = AuthService::new(
            store,
            Arc::new(Argon2Hasher::new()),
            keys.clone(),
            PasswordPolicy::new(config.password_min_length),
        )
        .context("build auth service")?;

        Ok(Self {
            db,
            config,
            auth: Arc::new(auth),
            keys,
        })
    }
}
