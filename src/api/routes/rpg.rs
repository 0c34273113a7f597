use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{json_body, path_param, query_params};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::models::{RankedRpgEntry, RpgEntryView, RpgSubmission};

#[derive(Debug, Deserialize)]
pub struct RpgLeaderboardQuery {
    pub limit: Option<usize>,
}

/// Query-string form of a submission, as sent by older clients.
#[derive(Debug, Deserialize)]
pub struct RpgSubmitQuery {
    pub level_id: Option<i32>,
    pub score: Option<i32>,
    pub time_seconds: Option<f64>,
}

impl RpgSubmitQuery {
    fn submission(&self) -> Option<RpgSubmission> {
        Some(RpgSubmission {
            level_id: self.level_id?,
            score: self.score?,
            time_seconds: self.time_seconds?,
        })
    }
}

/// POST /rpg/leaderboard
///
/// Takes a JSON body. Without one, all three fields may be given in the
/// query string instead.
pub async fn submit_rpg_score(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    query: Result<Query<RpgSubmitQuery>, QueryRejection>,
    payload: Result<Json<RpgSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RpgEntryView>)> {
    let req = match (payload, query_params(query)?.submission()) {
        (Ok(Json(body)), _) => body,
        (Err(_), Some(from_query)) => from_query,
        (payload, None) => json_body(payload)?,
    };
    let entry = state
        .rpg
        .submit(&user, req.level_id, req.score, req.time_seconds)
        .await?;
    Ok((StatusCode::CREATED, Json(RpgEntryView::from(&entry))))
}

/// GET /rpg/leaderboard/:level_id?limit=10
pub async fn get_rpg_leaderboard(
    State(state): State<Arc<AppState>>,
    level_id: Result<Path<i32>, PathRejection>,
    query: Result<Query<RpgLeaderboardQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<RankedRpgEntry>>> {
    let level_id = path_param(level_id)?;
    let query = query_params(query)?;
    let limit = state
        .config
        .clamp_limit(query.limit, state.config.rpg_default_limit);

    Ok(Json(state.rpg.top_for_level(level_id, limit).await?))
}
