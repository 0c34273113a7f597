//! API route handlers.
//!
//! Each submodule handles one resource:
//! - `auth`: signup, login, logout, profile
//! - `leaderboard`: classic mode high scores
//! - `live_players`: spectator mirror of running games (no auth)
//! - `rpg`: per-level RPG results

pub mod auth;
pub mod leaderboard;
pub mod live_players;
pub mod rpg;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;

use crate::error::{ApiError, ApiResult};

pub async fn health_check() -> &'static str {
    "OK"
}

// Framework rejections are reported as 400 with the framework's own message.

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::InvalidArgument(e.body_text()))
}

pub(crate) fn path_param<T>(param: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    param
        .map(|Path(value)| value)
        .map_err(|e| ApiError::InvalidArgument(e.body_text()))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|e| ApiError::InvalidArgument(e.body_text()))
}
