//! Database-backed authentication for axum-login.

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use axum_login::{AuthUser, AuthnBackend, UserId};
use rand::rngs::OsRng;
use tokio::task;

use crate::domain::account::User;
use crate::domain::error::FinanceError;
use crate::ports::store_port::StorePort;

/// Session-facing wrapper around a stored user row.
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

impl AuthUser for SessionUser {
    type Id = i64;

    fn id(&self) -> i64 {
        self.0.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        // Changing the password invalidates existing sessions.
        self.0.password_hash.as_bytes()
    }
}

/// Login credentials submitted via the login form.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Authentication backend that verifies against the user store.
#[derive(Clone)]
pub struct Backend {
    store: Arc<dyn StorePort + Send + Sync>,
}

impl Backend {
    pub fn new(store: Arc<dyn StorePort + Send + Sync>) -> Self {
        Self { store }
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

/// Argon2id hash with a random salt, as stored in `users.password_hash`.
pub fn hash_password(password: &str) -> Result<String, FinanceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FinanceError::PasswordHash {
            reason: e.to_string(),
        })
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn join_err(e: task::JoinError) -> FinanceError {
    FinanceError::Database {
        reason: e.to_string(),
    }
}

impl AuthnBackend for Backend {
    type User = SessionUser;
    type Credentials = Credentials;
    type Error = FinanceError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let store = self.store.clone();
        let username = creds.username.clone();
        let user = task::spawn_blocking(move || store.find_user_by_name(&username))
            .await
            .map_err(join_err)??;

        let Some(user) = user else {
            return Ok(None);
        };

        // Argon2 verification is CPU-bound; keep it off the async workers.
        let hash = user.password_hash.clone();
        let password = creds.password;
        let verified = task::spawn_blocking(move || verify_password(&hash, &password))
            .await
            .map_err(join_err)?;

        Ok(verified.then(|| SessionUser(user)))
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        let store = self.store.clone();
        let id = *user_id;
        let user = task::spawn_blocking(move || store.find_user_by_id(id))
            .await
            .map_err(join_err)??;

        Ok(user.map(SessionUser))
    }
}
