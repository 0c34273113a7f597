use tokio_postgres::Row;

use crate::models::{NewRpgEntry, RpgEntry};
use crate::storage::pg::PgPool;
use crate::storage::Result;

fn entry_from_row(row: &Row) -> RpgEntry {
    RpgEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        level_id: row.get("level_id"),
        score: row.get("score"),
        time_seconds: row.get("time_seconds"),
        completed_at: row.get("completed_at"),
    }
}

pub async fn insert_entry(pool: &PgPool, entry: &NewRpgEntry) -> Result<RpgEntry> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            "INSERT INTO rpg_leaderboard (user_id, username, level_id, score, time_seconds)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, username, level_id, score, time_seconds, completed_at",
            &[
                &entry.user_id,
                &entry.username,
                &entry.level_id,
                &entry.score,
                &entry.time_seconds,
            ],
        )
        .await?;

    Ok(entry_from_row(&row))
}

pub async fn get_level_leaderboard(
    pool: &PgPool,
    level_id: i32,
    limit: i64,
) -> Result<Vec<RpgEntry>> {
    let client = pool.get().await?;

    let rows = client
        .query(
            "SELECT id, user_id, username, level_id, score, time_seconds, completed_at
             FROM rpg_leaderboard
             WHERE level_id = $1
             ORDER BY score DESC, time_seconds ASC, id ASC
             LIMIT $2",
            &[&level_id, &limit],
        )
        .await?;

    Ok(rows.iter().map(entry_from_row).collect())
}
