use chrono::{DateTime, Utc};
use tokio_postgres::Row;

use super::parse_column;
use crate::models::{LivePlayer, LivePlayerState, Position};
use crate::storage::pg::PgPool;
use crate::storage::{Result, StorageError};

const LIVE_COLUMNS: &str =
    "id, username, score, mode, snake, food, direction, status, last_updated";

fn player_from_row(row: &Row) -> Result<LivePlayer> {
    let mode: String = row.get("mode");
    let direction: String = row.get("direction");
    let status: String = row.get("status");
    let snake: serde_json::Value = row.get("snake");
    let food: serde_json::Value = row.get("food");

    Ok(LivePlayer {
        id: row.get("id"),
        username: row.get("username"),
        score: row.get("score"),
        mode: parse_column(&mode)?,
        snake: serde_json::from_value::<Vec<Position>>(snake)?,
        food: serde_json::from_value::<Position>(food)?,
        direction: parse_column(&direction)?,
        status: parse_column(&status)?,
        last_updated: row.get("last_updated"),
    })
}

/// `ON CONFLICT DO NOTHING` keeps the existing session intact; no row back
/// means the id was already taken.
pub async fn insert_live_player(pool: &PgPool, player: &LivePlayer) -> Result<LivePlayer> {
    let client = pool.get().await?;
    let snake = serde_json::to_value(&player.snake)?;
    let food = serde_json::to_value(player.food)?;

    let row = client
        .query_opt(
            &format!(
                "INSERT INTO live_players
                    (id, username, score, mode, snake, food, direction, status, last_updated)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (id) DO NOTHING
                 RETURNING {}",
                LIVE_COLUMNS
            ),
            &[
                &player.id,
                &player.username,
                &player.score,
                &player.mode.as_str(),
                &snake,
                &food,
                &player.direction.as_str(),
                &player.status.as_str(),
                &player.last_updated,
            ],
        )
        .await?;

    match row {
        Some(row) => player_from_row(&row),
        None => Err(StorageError::Conflict(format!(
            "live player {} already exists",
            player.id
        ))),
    }
}

pub async fn get_live_player(pool: &PgPool, id: &str) -> Result<Option<LivePlayer>> {
    let client = pool.get().await?;

    let row = client
        .query_opt(
            &format!("SELECT {} FROM live_players WHERE id = $1", LIVE_COLUMNS),
            &[&id],
        )
        .await?;

    row.as_ref().map(player_from_row).transpose()
}

pub async fn list_live_players(pool: &PgPool) -> Result<Vec<LivePlayer>> {
    let client = pool.get().await?;

    let rows = client
        .query(
            &format!(
                "SELECT {} FROM live_players ORDER BY created_at ASC, id ASC",
                LIVE_COLUMNS
            ),
            &[],
        )
        .await?;

    rows.iter().map(player_from_row).collect()
}

pub async fn update_live_player(
    pool: &PgPool,
    id: &str,
    state: &LivePlayerState,
    updated_at: DateTime<Utc>,
) -> Result<Option<LivePlayer>> {
    let client = pool.get().await?;
    let snake = serde_json::to_value(&state.snake)?;
    let food = serde_json::to_value(state.food)?;

    let row = client
        .query_opt(
            &format!(
                "UPDATE live_players SET
                    score = $2,
                    snake = $3,
                    food = $4,
                    direction = $5,
                    status = $6,
                    last_updated = $7
                 WHERE id = $1
                 RETURNING {}",
                LIVE_COLUMNS
            ),
            &[
                &id,
                &state.score,
                &snake,
                &food,
                &state.direction.as_str(),
                &state.status.as_str(),
                &updated_at,
            ],
        )
        .await?;

    row.as_ref().map(player_from_row).transpose()
}

pub async fn delete_live_player(pool: &PgPool, id: &str) -> Result<bool> {
    let client = pool.get().await?;

    let rows_affected = client
        .execute("DELETE FROM live_players WHERE id = $1", &[&id])
        .await?;

    Ok(rows_affected > 0)
}
