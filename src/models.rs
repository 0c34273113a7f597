//! Domain records and their wire representations.
//!
//! Internal identifiers are integers; every identifier crosses the wire as a
//! string. Enumerated fields serialize exactly as the game client spells them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;
pub type EntryId = i64;

/// Lowest and highest RPG level that accepts results.
pub const MIN_LEVEL_ID: i32 = 1;
pub const MAX_LEVEL_ID: i32 = 20;

// ============================================================================
// ENUMS
// ============================================================================

/// Game ruleset variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Edges wrap around.
    #[serde(rename = "pass-through")]
    PassThrough,
    /// Edges kill.
    #[serde(rename = "walls")]
    Walls,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::PassThrough => "pass-through",
            GameMode::Walls => "walls",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass-through" => Ok(GameMode::PassThrough),
            "walls" => Ok(GameMode::Walls),
            other => Err(format!("unknown game mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            "LEFT" => Ok(Direction::Left),
            "RIGHT" => Ok(Direction::Right),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Idle => "idle",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "game-over",
        }
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(GameStatus::Idle),
            "playing" => Ok(GameStatus::Playing),
            "paused" => Ok(GameStatus::Paused),
            "game-over" => Ok(GameStatus::GameOver),
            other => Err(format!("unknown game status: {}", other)),
        }
    }
}

/// A cell on the game grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

// ============================================================================
// STORED RECORDS
// ============================================================================

/// Registered account. Never exposed directly: see [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Immutable score record. `username` is a snapshot taken at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub username: String,
    pub score: i32,
    pub mode: GameMode,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLeaderboardEntry {
    pub user_id: UserId,
    pub username: String,
    pub score: i32,
    pub mode: GameMode,
}

/// Mirror of an in-progress game, keyed by a client-chosen session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePlayer {
    pub id: String,
    pub username: String,
    pub score: i32,
    pub mode: GameMode,
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
    pub status: GameStatus,
    pub last_updated: DateTime<Utc>,
}

/// Mutable part of a live player, replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LivePlayerState {
    pub score: i32,
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
    pub status: GameStatus,
}

/// One RPG level completion. `username` is a snapshot taken at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct RpgEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub username: String,
    pub level_id: i32,
    pub score: i32,
    pub time_seconds: f64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRpgEntry {
    pub user_id: UserId,
    pub username: String,
    pub level_id: i32,
    pub score: i32,
    pub time_seconds: f64,
}

// ============================================================================
// WIRE TYPES
// ============================================================================

/// User profile as returned to clients; no credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreSubmission {
    pub score: i32,
    pub mode: GameMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntryView {
    pub id: String,
    pub username: String,
    pub score: i32,
    pub mode: GameMode,
    /// Calendar day of the submission, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

impl From<&LeaderboardEntry> for LeaderboardEntryView {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            username: entry.username.clone(),
            score: entry.score,
            mode: entry.mode,
            date: entry.recorded_at.date_naive(),
        }
    }
}

/// Body of `POST /live-players`. Any `last_updated` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLivePlayer {
    pub id: String,
    pub username: String,
    pub score: i32,
    pub mode: GameMode,
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
    pub status: GameStatus,
}

impl CreateLivePlayer {
    pub fn state(&self) -> LivePlayerState {
        LivePlayerState {
            score: self.score,
            snake: self.snake.clone(),
            food: self.food,
            direction: self.direction,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpgSubmission {
    pub level_id: i32,
    pub score: i32,
    pub time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpgEntryView {
    pub id: String,
    pub username: String,
    pub level_id: i32,
    pub score: i32,
    pub time_seconds: f64,
    pub completed_at: DateTime<Utc>,
}

impl From<&RpgEntry> for RpgEntryView {
    fn from(entry: &RpgEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            username: entry.username.clone(),
            level_id: entry.level_id,
            score: entry.score,
            time_seconds: entry.time_seconds,
            completed_at: entry.completed_at,
        }
    }
}

/// RPG result annotated with its 1-based position in the level ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRpgEntry {
    pub rank: u32,
    pub username: String,
    pub score: i32,
    pub time_seconds: f64,
    pub completed_at: DateTime<Utc>,
}
