//! Registry of in-progress games for spectators.
//!
//! A mirror of whatever the client simulation reports. Moves are not checked
//! for legality. Sessions never expire on their own: the client deletes them.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateLivePlayer, LivePlayer, LivePlayerState};
use crate::storage::GameStore;

#[derive(Clone)]
pub struct LiveSessionRegistry {
    store: Arc<dyn GameStore>,
}

impl LiveSessionRegistry {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Fails with `Conflict` if a session with this id exists.
    pub async fn create(&self, request: CreateLivePlayer) -> ApiResult<LivePlayer> {
        if request.id.trim().is_empty() {
            return Err(ApiError::InvalidArgument("id must not be empty".into()));
        }
        let state = request.state();
        validate_state(&state)?;

        let player = LivePlayer {
            id: request.id,
            username: request.username,
            score: state.score,
            mode: request.mode,
            snake: state.snake,
            food: state.food,
            direction: state.direction,
            status: state.status,
            last_updated: Utc::now(),
        };

        let player = self.store.insert_live_player(player).await?;
        info!("Live session {} started by {}", player.id, player.username);
        Ok(player)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Option<LivePlayer>> {
        Ok(self.store.live_player(id).await?)
    }

    pub async fn list_all(&self) -> ApiResult<Vec<LivePlayer>> {
        let players = self.store.list_live_players().await?;
        debug!("{} live sessions", players.len());
        Ok(players)
    }

    /// Replaces every mutable field. `None` when the session does not exist.
    pub async fn update(&self, id: &str, state: LivePlayerState) -> ApiResult<Option<LivePlayer>> {
        validate_state(&state)?;
        Ok(self.store.update_live_player(id, state, Utc::now()).await?)
    }

    /// Whether a session was actually removed.
    pub async fn delete(&self, id: &str) -> ApiResult<bool> {
        let removed = self.store.delete_live_player(id).await?;
        if removed {
            info!("Live session {} ended", id);
        }
        Ok(removed)
    }
}

fn validate_state(state: &LivePlayerState) -> ApiResult<()> {
    if state.score < 0 {
        return Err(ApiError::InvalidArgument("score must not be negative".into()));
    }
    if state.snake.is_empty() {
        return Err(ApiError::InvalidArgument("snake must have at least one segment".into()));
    }
    Ok(())
}
