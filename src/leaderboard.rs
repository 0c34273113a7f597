//! Per-mode high score table. Append-only.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::models::{GameMode, LeaderboardEntry, NewLeaderboardEntry, User};
use crate::storage::GameStore;

#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn GameStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Records a new entry even when the user already holds a better one.
    pub async fn submit(&self, user: &User, score: i32, mode: GameMode) -> ApiResult<LeaderboardEntry> {
        if score < 0 {
            return Err(ApiError::InvalidArgument("score must not be negative".into()));
        }

        let entry = self
            .store
            .insert_score(NewLeaderboardEntry {
                user_id: user.id,
                username: user.username.clone(),
                score,
                mode,
            })
            .await?;

        info!(
            "Recorded score {} ({}) for {} as entry {}",
            entry.score, entry.mode, entry.username, entry.id
        );
        Ok(entry)
    }

    /// Best first. Equal scores keep submission order.
    pub async fn list(&self, mode: Option<GameMode>, limit: usize) -> ApiResult<Vec<LeaderboardEntry>> {
        let entries = self.store.list_scores(mode, limit).await?;
        debug!(
            "Leaderboard query mode={:?} limit={} -> {} entries",
            mode,
            limit,
            entries.len()
        );
        Ok(entries)
    }
}
