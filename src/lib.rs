//! Snake Showdown backend.
//!
//! Accounts with bearer-token sessions, classic-mode leaderboards, a live
//! session mirror for spectators, and RPG level rankings, served over JSON.
//!
//! ## Module Structure
//!
//! - `models`: records and wire types
//! - `crypto/`: password hashing and token signing
//! - `storage/`: the `GameStore` seam with memory and PostgreSQL backends
//! - `accounts`, `auth`, `leaderboard`, `live`, `rpg`: services
//! - `api/`: axum router, state and handlers

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod leaderboard;
pub mod live;
pub mod models;
pub mod rpg;
pub mod seed;
pub mod storage;

pub use api::{router, AppState};
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use storage::{GameStore, MemoryStore, PgStore};
