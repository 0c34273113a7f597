//! Account endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::json_body;
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, LoginRequest, PublicUser, SignupRequest};

/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let req = json_body(payload)?;
    let user = state
        .accounts
        .register(&req.username, &req.email, &req.password)
        .await?;
    let token = state.guard.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: PublicUser::from(&user),
            token,
        }),
    ))
}

/// POST /auth/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let req = json_body(payload)?;
    let user = state
        .accounts
        .verify_credentials(&req.email, &req.password)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    let token = state.guard.issue(&user)?;

    Ok(Json(AuthResponse {
        user: PublicUser::from(&user),
        token,
    }))
}

/// POST /auth/logout
///
/// Tokens are stateless, so this only confirms the token is valid. The
/// client discards it.
pub async fn logout(AuthUser(_user): AuthUser) -> Json<Value> {
    Json(json!({ "message": "Successfully logged out" }))
}

/// GET /auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(PublicUser::from(&user))
}
