use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{json_body, query_params};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::models::{GameMode, LeaderboardEntryView, ScoreSubmission};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub mode: Option<GameMode>,
    pub limit: Option<usize>,
}

/// GET /leaderboard?mode=walls&limit=100
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LeaderboardEntryView>>> {
    let query = query_params(query)?;
    let limit = state
        .config
        .clamp_limit(query.limit, state.config.leaderboard_default_limit);

    let entries = state.leaderboard.list(query.mode, limit).await?;
    Ok(Json(entries.iter().map(LeaderboardEntryView::from).collect()))
}

/// POST /leaderboard
pub async fn submit_score(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LeaderboardEntryView>)> {
    let req = json_body(payload)?;
    let entry = state.leaderboard.submit(&user, req.score, req.mode).await?;
    Ok((StatusCode::CREATED, Json(LeaderboardEntryView::from(&entry))))
}
