//! Process-local [`GameStore`].
//!
//! All tables live behind one lock so each operation is atomic, including the
//! duplicate-key checks. Each instance is independent: tests build their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Ordering;

use super::{GameStore, Result, StorageError};
use crate::models::{
    EntryId, GameMode, LeaderboardEntry, LivePlayer, LivePlayerState, NewLeaderboardEntry,
    NewRpgEntry, NewUser, RpgEntry, User, UserId,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    leaderboard: Vec<LeaderboardEntry>,
    live_players: Vec<LivePlayer>,
    rpg: Vec<RpgEntry>,
    next_user_id: UserId,
    next_entry_id: EntryId,
    next_rpg_id: EntryId,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write();

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict("email already registered".to_string()));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StorageError::Conflict("username already taken".to_string()));
        }

        tables.next_user_id += 1;
        let stored = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_score(&self, entry: NewLeaderboardEntry) -> Result<LeaderboardEntry> {
        let mut tables = self.tables.write();
        tables.next_entry_id += 1;
        let stored = LeaderboardEntry {
            id: tables.next_entry_id,
            user_id: entry.user_id,
            username: entry.username,
            score: entry.score,
            mode: entry.mode,
            recorded_at: Utc::now(),
        };
        tables.leaderboard.push(stored.clone());
        Ok(stored)
    }

    async fn list_scores(
        &self,
        mode: Option<GameMode>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>> {
        let tables = self.tables.read();
        let mut entries: Vec<LeaderboardEntry> = tables
            .leaderboard
            .iter()
            .filter(|e| mode.map_or(true, |m| e.mode == m))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn insert_live_player(&self, player: LivePlayer) -> Result<LivePlayer> {
        let mut tables = self.tables.write();
        if tables.live_players.iter().any(|p| p.id == player.id) {
            return Err(StorageError::Conflict(format!(
                "live player {} already exists",
                player.id
            )));
        }
        tables.live_players.push(player.clone());
        Ok(player)
    }

    async fn live_player(&self, id: &str) -> Result<Option<LivePlayer>> {
        let tables = self.tables.read();
        Ok(tables.live_players.iter().find(|p| p.id == id).cloned())
    }

    async fn list_live_players(&self) -> Result<Vec<LivePlayer>> {
        Ok(self.tables.read().live_players.clone())
    }

    async fn update_live_player(
        &self,
        id: &str,
        state: LivePlayerState,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<LivePlayer>> {
        let mut tables = self.tables.write();
        let Some(player) = tables.live_players.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        player.score = state.score;
        player.snake = state.snake;
        player.food = state.food;
        player.direction = state.direction;
        player.status = state.status;
        player.last_updated = updated_at;
        Ok(Some(player.clone()))
    }

    async fn delete_live_player(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.live_players.len();
        tables.live_players.retain(|p| p.id != id);
        Ok(tables.live_players.len() != before)
    }

    async fn insert_rpg_entry(&self, entry: NewRpgEntry) -> Result<RpgEntry> {
        let mut tables = self.tables.write();
        tables.next_rpg_id += 1;
        let stored = RpgEntry {
            id: tables.next_rpg_id,
            user_id: entry.user_id,
            username: entry.username,
            level_id: entry.level_id,
            score: entry.score,
            time_seconds: entry.time_seconds,
            completed_at: Utc::now(),
        };
        tables.rpg.push(stored.clone());
        Ok(stored)
    }

    async fn top_rpg_entries(&self, level_id: i32, limit: usize) -> Result<Vec<RpgEntry>> {
        let tables = self.tables.read();
        let mut entries: Vec<RpgEntry> = tables
            .rpg
            .iter()
            .filter(|e| e.level_id == level_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(
                    a.time_seconds
                        .partial_cmp(&b.time_seconds)
                        .unwrap_or(Ordering::Equal),
                )
                .then(a.id.cmp(&b.id))
        });
        entries.truncate(limit);
        Ok(entries)
    }
}
