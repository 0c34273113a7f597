use tokio_postgres::Row;

use super::parse_column;
use crate::models::{GameMode, LeaderboardEntry, NewLeaderboardEntry};
use crate::storage::pg::PgPool;
use crate::storage::Result;

fn entry_from_row(row: &Row) -> Result<LeaderboardEntry> {
    let mode: String = row.get("mode");
    Ok(LeaderboardEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        score: row.get("score"),
        mode: parse_column(&mode)?,
        recorded_at: row.get("recorded_at"),
    })
}

pub async fn insert_entry(pool: &PgPool, entry: &NewLeaderboardEntry) -> Result<LeaderboardEntry> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            "INSERT INTO leaderboard (user_id, username, score, mode)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, username, score, mode, recorded_at",
            &[
                &entry.user_id,
                &entry.username,
                &entry.score,
                &entry.mode.as_str(),
            ],
        )
        .await?;

    entry_from_row(&row)
}

/// Ties on score fall back to id so equal scores list in submission order.
pub async fn get_leaderboard(
    pool: &PgPool,
    mode: Option<GameMode>,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>> {
    let client = pool.get().await?;

    let rows = match mode {
        Some(mode) => {
            client
                .query(
                    "SELECT id, user_id, username, score, mode, recorded_at
                     FROM leaderboard
                     WHERE mode = $1
                     ORDER BY score DESC, id ASC
                     LIMIT $2",
                    &[&mode.as_str(), &limit],
                )
                .await?
        }
        None => {
            client
                .query(
                    "SELECT id, user_id, username, score, mode, recorded_at
                     FROM leaderboard
                     ORDER BY score DESC, id ASC
                     LIMIT $1",
                    &[&limit],
                )
                .await?
        }
    };

    rows.iter().map(entry_from_row).collect()
}
