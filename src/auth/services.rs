use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::Token,
        jwt::TokenSigner,
        password::Hasher,
        policy::{is_valid_email, normalize_email, PasswordPolicy},
        repo_types::PublicUser,
        store::CredentialStore,
    },
    error::{AppError, AppResult},
};

// Verified against when the email is unknown, so both login failures do the same work.
const DECOY_PASSWORD: &str = "Decoy-Passw0rd-never-issued";

/// Registration and login over injected store, hasher and signer.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn Hasher>,
    signer: Arc<dyn TokenSigner>,
    policy: PasswordPolicy,
    decoy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn Hasher>,
        signer: Arc<dyn TokenSigner>,
        policy: PasswordPolicy,
    ) -> anyhow::Result<Self> {
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?;
        Ok(Self {
            store,
            hasher,
            signer,
            policy,
            decoy_hash,
        })
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> AppResult<PublicUser> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::InvalidEmail);
        }

        if let Err(rules) = self.policy.check(password) {
            warn!(email = %email, violated = rules.len(), "password rejected by policy");
            return Err(AppError::InvalidPassword(rules));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let hash = self.hash_off_runtime(password).await?;

        // a concurrent registration may still win the race; the store reports it
        let user = self.store.insert(&email, &hash).await?;

        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(user.into())
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Token> {
        let email = normalize_email(email);

        let user = match self.store.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                let _ = self.verify_off_runtime(password, &self.decoy_hash).await;
                warn!(email = %email, "login unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        match self.verify_off_runtime(password, &user.password_hash).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(email = %email, user_id = user.id, "login invalid password");
                return Err(AppError::InvalidCredentials);
            }
            Err(err) => {
                // answered like a wrong password so the account's existence stays hidden
                error!(user_id = user.id, error = ?err, "stored password hash unusable");
                return Err(AppError::InvalidCredentials);
            }
        }

        let user = PublicUser::from(user);
        let access_token = self.signer.issue(&user)?;

        info!(user_id = user.id, email = %user.email, "user logged in");
        Ok(Token::bearer(access_token))
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_off_runtime(&self, password: &str) -> anyhow::Result<String> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("password hashing task panicked")?
    }

    async fn verify_off_runtime(&self, password: &str, hash: &str) -> anyhow::Result<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .context("password verification task panicked")?
    }
}
