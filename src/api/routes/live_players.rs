//! Live game endpoints. Public: any client may publish or watch a session.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::json_body;
use crate::api::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateLivePlayer, LivePlayer, LivePlayerState};

fn player_not_found() -> ApiError {
    ApiError::NotFound("Player not found".to_string())
}

/// GET /live-players
pub async fn list_live_players(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<LivePlayer>>> {
    Ok(Json(state.live.list_all().await?))
}

/// GET /live-players/:id
pub async fn get_live_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LivePlayer>> {
    state
        .live
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(player_not_found)
}

/// POST /live-players
pub async fn create_live_player(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateLivePlayer>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LivePlayer>)> {
    let req = json_body(payload)?;
    let player = state.live.create(req).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// PUT /live-players/:id
///
/// Accepts the mutable fields alone or a full live-player body; identity
/// fields in the body are ignored.
pub async fn update_live_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<LivePlayerState>, JsonRejection>,
) -> ApiResult<Json<LivePlayer>> {
    let req = json_body(payload)?;
    state
        .live
        .update(&id, req)
        .await?
        .map(Json)
        .ok_or_else(player_not_found)
}

/// DELETE /live-players/:id
pub async fn delete_live_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.live.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(player_not_found())
    }
}
