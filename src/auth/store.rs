//! Credential store abstraction and the in-memory implementation.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
};

/// Persistence for user records. The store is the sole arbiter of email
/// uniqueness: `insert` must fail with [`AppError::DuplicateEmail`] when the
/// email is already taken, even if a prior lookup saw it free.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact-match lookup; callers normalise the email first.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn insert(&self, email: &str, password_hash: &str) -> AppResult<User>;
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    next_id: i64,
}

/// Map-backed store with sequential ids starting at 1.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: Mutex<Inner>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        // a poisoned map is still readable for a count
        self.inner
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .users
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> AppError {
    AppError::Internal(anyhow::anyhow!("credential store lock poisoned"))
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.lock().map_err(|_| poisoned())?;
        Ok(inner.users.get(email).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let mut inner = self.inner.lock().map_err(|_| poisoned())?;
        if inner.users.contains_key(email) {
            return Err(AppError::DuplicateEmail);
        }
        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(email.to_string(), user.clone());
        Ok(user)
    }
}
