use tokio_postgres::Row;

use super::map_unique_violation;
use crate::models::{NewUser, User, UserId};
use crate::storage::pg::PgPool;
use crate::storage::Result;

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

pub async fn insert_user(pool: &PgPool, user: &NewUser) -> Result<User> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            &format!(
                "INSERT INTO users (username, email, password_hash)
                 VALUES ($1, $2, $3)
                 RETURNING {}",
                USER_COLUMNS
            ),
            &[&user.username, &user.email, &user.password_hash],
        )
        .await
        .map_err(|e| map_unique_violation(e, "email or username already registered"))?;

    Ok(user_from_row(&row))
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;

    let row = client
        .query_opt(
            &format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS),
            &[&email],
        )
        .await?;

    Ok(row.as_ref().map(user_from_row))
}

pub async fn get_user_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>> {
    let client = pool.get().await?;

    let row = client
        .query_opt(
            &format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS),
            &[&id],
        )
        .await?;

    Ok(row.as_ref().map(user_from_row))
}
