//! Account registration and lookup.

use std::sync::Arc;

use tracing::{info, warn};

use crate::crypto::CredentialStore;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, User, UserId};
use crate::storage::GameStore;

#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn GameStore>,
    credentials: CredentialStore,
}

impl AccountManager {
    pub fn new(store: Arc<dyn GameStore>, credentials: CredentialStore) -> Self {
        Self { store, credentials }
    }

    /// Creates an account. Email and username must both be unused.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<User> {
        let username = username.trim();
        let email = email.trim();
        validate_signup(username, email, password)?;

        if self.store.user_by_email(email).await?.is_some() {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let credentials = self.credentials.clone();
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self.store.user_by_email(email.trim()).await?)
    }

    pub async fn find_by_id(&self, id: UserId) -> ApiResult<Option<User>> {
        Ok(self.store.user_by_id(id).await?)
    }

    /// `None` for an unknown email and for a wrong password alike. An unknown
    /// email still pays for one hash verification.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> ApiResult<Option<User>> {
        let user = self.find_by_email(email).await?;

        let credentials = self.credentials.clone();
        let password = password.to_string();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let matched = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => credentials.verify(&password, &hash),
            None => credentials.verify_decoy(&password),
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

        if matched {
            Ok(user)
        } else {
            warn!("Rejected login attempt");
            Ok(None)
        }
    }
}

fn validate_signup(username: &str, email: &str, password: &str) -> ApiResult<()> {
    if username.is_empty() {
        return Err(ApiError::InvalidArgument("username must not be empty".into()));
    }
    if !is_plausible_email(email) {
        return Err(ApiError::InvalidArgument("email is not valid".into()));
    }
    if password.is_empty() {
        return Err(ApiError::InvalidArgument("password must not be empty".into()));
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}
