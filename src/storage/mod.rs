//! Data persistence layer.
//!
//! [`GameStore`] is the seam between the services and the backing database.
//! Two implementations exist: [`memory::MemoryStore`] for tests and local
//! development, and [`postgres::PgStore`] for durable deployments.

pub mod memory;
pub mod pg;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    GameMode, LeaderboardEntry, LivePlayer, LivePlayerState, NewLeaderboardEntry, NewRpgEntry,
    NewUser, RpgEntry, User, UserId,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    #[error("pool error: {0}")]
    Pool(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A unique key is already taken.
    #[error("{0}")]
    Conflict(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<tokio_postgres::Error> for StorageError {
    fn from(err: tokio_postgres::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for StorageError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StorageError::Pool(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Every write is a single atomic insert, update or delete.
#[async_trait]
pub trait GameStore: Send + Sync {
    // ==================== Users ====================

    /// Fails with [`StorageError::Conflict`] when the email or username is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>>;

    // ==================== Leaderboard ====================

    async fn insert_score(&self, entry: NewLeaderboardEntry) -> Result<LeaderboardEntry>;

    /// Highest score first; equal scores in id order.
    async fn list_scores(&self, mode: Option<GameMode>, limit: usize)
        -> Result<Vec<LeaderboardEntry>>;

    // ==================== Live Players ====================

    /// Fails with [`StorageError::Conflict`] when the id exists. Never overwrites.
    async fn insert_live_player(&self, player: LivePlayer) -> Result<LivePlayer>;
    async fn live_player(&self, id: &str) -> Result<Option<LivePlayer>>;
    /// Sessions in creation order.
    async fn list_live_players(&self) -> Result<Vec<LivePlayer>>;
    async fn update_live_player(
        &self,
        id: &str,
        state: LivePlayerState,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<LivePlayer>>;
    /// Returns whether a row was removed.
    async fn delete_live_player(&self, id: &str) -> Result<bool>;

    // ==================== RPG ====================

    async fn insert_rpg_entry(&self, entry: NewRpgEntry) -> Result<RpgEntry>;

    /// Highest score first, then fastest time, then id.
    async fn top_rpg_entries(&self, level_id: i32, limit: usize) -> Result<Vec<RpgEntry>>;
}
