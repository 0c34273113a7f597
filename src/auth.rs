//! Bearer-token session guard.
//!
//! Tokens are stateless: nothing is stored per session and logout has no
//! server-side effect. Every rejection, whatever the cause, surfaces as
//! [`ApiError::Unauthorized`].

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::accounts::AccountManager;
use crate::api::AppState;
use crate::crypto::TokenSigner;
use crate::error::{ApiError, ApiResult};
use crate::models::User;

#[derive(Clone)]
pub struct SessionGuard {
    signer: TokenSigner,
    accounts: AccountManager,
}

impl SessionGuard {
    pub fn new(signer: TokenSigner, accounts: AccountManager) -> Self {
        Self { signer, accounts }
    }

    pub fn issue(&self, user: &User) -> ApiResult<String> {
        self.signer
            .issue(user.id)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    pub async fn authenticate(&self, token: &str) -> ApiResult<User> {
        self.authenticate_at(token, Utc::now()).await
    }

    /// Resolves a token to a live account as of `now`.
    pub async fn authenticate_at(&self, token: &str, now: DateTime<Utc>) -> ApiResult<User> {
        let claims = self.signer.verify_at(token, now).map_err(|e| {
            debug!("Token rejected: {}", e);
            ApiError::Unauthorized
        })?;

        let Some(user_id) = claims.user_id() else {
            debug!("Token rejected: non-numeric subject");
            return Err(ApiError::Unauthorized);
        };

        match self.accounts.find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                debug!("Token rejected: user {} does not exist", user_id);
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The authenticated caller. Handlers taking this argument require a valid token.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let user = state.guard.authenticate(token).await?;
        Ok(AuthUser(user))
    }
}
