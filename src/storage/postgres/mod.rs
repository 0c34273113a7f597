//! PostgreSQL storage implementation.
//!
//! One module per table; [`PgStore`] wires them into [`GameStore`].

pub mod leaderboard;
pub mod live_players;
pub mod rpg;
pub mod users;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::error::SqlState;
use tracing::info;

use super::pg::{create_pool, PgConfig, PgPool};
use super::{GameStore, Result, StorageError};
use crate::models::{
    GameMode, LeaderboardEntry, LivePlayer, LivePlayerState, NewLeaderboardEntry, NewRpgEntry,
    NewUser, RpgEntry, User, UserId,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS leaderboard (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id),
    username TEXT NOT NULL,
    score INTEGER NOT NULL CHECK (score >= 0),
    mode TEXT NOT NULL CHECK (mode IN ('pass-through', 'walls')),
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_leaderboard_score ON leaderboard(score DESC, id ASC);
CREATE INDEX IF NOT EXISTS idx_leaderboard_mode ON leaderboard(mode);

-- Session id is client-chosen; the primary key is what stops concurrent duplicates.
CREATE TABLE IF NOT EXISTS live_players (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    score INTEGER NOT NULL DEFAULT 0 CHECK (score >= 0),
    mode TEXT NOT NULL CHECK (mode IN ('pass-through', 'walls')),
    snake JSONB NOT NULL,
    food JSONB NOT NULL,
    direction TEXT NOT NULL CHECK (direction IN ('UP', 'DOWN', 'LEFT', 'RIGHT')),
    status TEXT NOT NULL CHECK (status IN ('idle', 'playing', 'paused', 'game-over')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS rpg_leaderboard (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id),
    username TEXT NOT NULL,
    level_id INTEGER NOT NULL CHECK (level_id BETWEEN 1 AND 20),
    score INTEGER NOT NULL CHECK (score >= 0),
    time_seconds DOUBLE PRECISION NOT NULL CHECK (time_seconds >= 0),
    completed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_rpg_level_rank
    ON rpg_leaderboard(level_id, score DESC, time_seconds ASC);
CREATE INDEX IF NOT EXISTS idx_rpg_user ON rpg_leaderboard(user_id);
"#;

/// Maps a unique-key violation to [`StorageError::Conflict`].
pub(crate) fn map_unique_violation(err: tokio_postgres::Error, what: &str) -> StorageError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        StorageError::Conflict(what.to_string())
    } else {
        StorageError::from(err)
    }
}

pub(crate) fn parse_column<T>(value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse().map_err(StorageError::InvalidData)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Builds the pool, checks connectivity and creates missing tables.
    pub async fn connect(cfg: &PgConfig) -> Result<Self> {
        let pool = create_pool(cfg).map_err(|e| StorageError::Pool(e.to_string()))?;

        let client = pool.get().await?;
        info!("Connected to PostgreSQL database");

        client.batch_execute(SCHEMA).await?;
        info!("Database schema initialized");

        Ok(Self { pool })
    }
}

#[async_trait]
impl GameStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        users::insert_user(&self.pool, &user).await
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        users::get_user_by_email(&self.pool, email).await
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
        users::get_user_by_id(&self.pool, id).await
    }

    async fn insert_score(&self, entry: NewLeaderboardEntry) -> Result<LeaderboardEntry> {
        leaderboard::insert_entry(&self.pool, &entry).await
    }

    async fn list_scores(
        &self,
        mode: Option<GameMode>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>> {
        leaderboard::get_leaderboard(&self.pool, mode, limit as i64).await
    }

    async fn insert_live_player(&self, player: LivePlayer) -> Result<LivePlayer> {
        live_players::insert_live_player(&self.pool, &player).await
    }

    async fn live_player(&self, id: &str) -> Result<Option<LivePlayer>> {
        live_players::get_live_player(&self.pool, id).await
    }

    async fn list_live_players(&self) -> Result<Vec<LivePlayer>> {
        live_players::list_live_players(&self.pool).await
    }

    async fn update_live_player(
        &self,
        id: &str,
        state: LivePlayerState,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<LivePlayer>> {
        live_players::update_live_player(&self.pool, id, &state, updated_at).await
    }

    async fn delete_live_player(&self, id: &str) -> Result<bool> {
        live_players::delete_live_player(&self.pool, id).await
    }

    async fn insert_rpg_entry(&self, entry: NewRpgEntry) -> Result<RpgEntry> {
        rpg::insert_entry(&self.pool, &entry).await
    }

    async fn top_rpg_entries(&self, level_id: i32, limit: usize) -> Result<Vec<RpgEntry>> {
        rpg::get_level_leaderboard(&self.pool, level_id, limit as i64).await
    }
}
