//! RPG level completion results and per-level rankings.

use std::sync::Arc;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewRpgEntry, RankedRpgEntry, RpgEntry, User, MAX_LEVEL_ID, MIN_LEVEL_ID};
use crate::storage::GameStore;

#[derive(Clone)]
pub struct RpgProgressService {
    store: Arc<dyn GameStore>,
}

pub fn validate_level(level_id: i32) -> ApiResult<()> {
    if (MIN_LEVEL_ID..=MAX_LEVEL_ID).contains(&level_id) {
        Ok(())
    } else {
        Err(ApiError::InvalidArgument(format!(
            "Level ID must be between {} and {}",
            MIN_LEVEL_ID, MAX_LEVEL_ID
        )))
    }
}

impl RpgProgressService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Appends one completion attempt. Nothing is written on invalid input.
    pub async fn submit(
        &self,
        user: &User,
        level_id: i32,
        score: i32,
        time_seconds: f64,
    ) -> ApiResult<RpgEntry> {
        validate_level(level_id)?;
        if score < 0 {
            return Err(ApiError::InvalidArgument("score must not be negative".into()));
        }
        if !time_seconds.is_finite() || time_seconds < 0.0 {
            return Err(ApiError::InvalidArgument(
                "time_seconds must be a non-negative number".into(),
            ));
        }

        let entry = self
            .store
            .insert_rpg_entry(NewRpgEntry {
                user_id: user.id,
                username: user.username.clone(),
                level_id,
                score,
                time_seconds,
            })
            .await?;

        info!(
            "Level {} completed by {}: score {} in {:.2}s",
            entry.level_id, entry.username, entry.score, entry.time_seconds
        );
        Ok(entry)
    }

    /// Ranked by score, then by the faster time. Ranks start at 1 and have no gaps.
    pub async fn top_for_level(&self, level_id: i32, limit: usize) -> ApiResult<Vec<RankedRpgEntry>> {
        validate_level(level_id)?;
        let entries = self.store.top_rpg_entries(level_id, limit).await?;

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| RankedRpgEntry {
                rank: idx as u32 + 1,
                username: entry.username,
                score: entry.score,
                time_seconds: entry.time_seconds,
                completed_at: entry.completed_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::storage::MemoryStore;

    async fn setup() -> (RpgProgressService, User, User) {
        let store = Arc::new(MemoryStore::new());
        let mut users = Vec::new();
        for (name, email) in [("alice", "a@x.com"), ("bob", "b@x.com")] {
            users.push(
                store
                    .insert_user(NewUser {
                        username: name.into(),
                        email: email.into(),
                        password_hash: "h".into(),
                    })
                    .await
                    .unwrap(),
            );
        }
        let bob = users.pop().unwrap();
        let alice = users.pop().unwrap();
        (RpgProgressService::new(store), alice, bob)
    }

    #[tokio::test]
    async fn test_equal_scores_rank_faster_first() {
        let (service, alice, bob) = setup().await;
        service.submit(&alice, 1, 500, 30.0).await.unwrap();
        service.submit(&bob, 1, 500, 20.0).await.unwrap();

        let ranked = service.top_for_level(1, 10).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].rank, ranked[0].username.as_str()), (1, "bob"));
        assert_eq!(ranked[0].time_seconds, 20.0);
        assert_eq!((ranked[1].rank, ranked[1].username.as_str()), (2, "alice"));
    }

    #[tokio::test]
    async fn test_ranks_contiguous_and_level_scoped() {
        let (service, alice, bob) = setup().await;
        service.submit(&alice, 3, 100, 50.0).await.unwrap();
        service.submit(&bob, 3, 900, 80.0).await.unwrap();
        service.submit(&alice, 3, 400, 10.0).await.unwrap();
        service.submit(&bob, 4, 10_000, 1.0).await.unwrap();

        let ranked = service.top_for_level(3, 10).await.unwrap();
        let ranks: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
        let scores: Vec<i32> = ranked.iter().map(|e| e.score).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(scores, vec![900, 400, 100]);

        let top_one = service.top_for_level(3, 1).await.unwrap();
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].score, 900);
    }

    #[tokio::test]
    async fn test_out_of_range_level_rejected_without_write() {
        let (service, alice, _) = setup().await;
        for level in [0, 21, -3] {
            let err = service.submit(&alice, level, 10, 1.0).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)));
            assert!(matches!(
                service.top_for_level(level, 10).await.unwrap_err(),
                ApiError::InvalidArgument(_)
            ));
        }
        for level in MIN_LEVEL_ID..=MAX_LEVEL_ID {
            assert!(service.top_for_level(level, 10).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_bad_time_or_score_rejected() {
        let (service, alice, _) = setup().await;
        assert!(service.submit(&alice, 1, 10, -0.5).await.is_err());
        assert!(service.submit(&alice, 1, 10, f64::NAN).await.is_err());
        assert!(service.submit(&alice, 1, -10, 3.0).await.is_err());
        assert!(service.top_for_level(1, 10).await.unwrap().is_empty());
    }
}
