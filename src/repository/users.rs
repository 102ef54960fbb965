use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::User;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub role: String,
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<UserView>, sqlx::Error> {
    sqlx::query_as::<_, UserView>("SELECT id, username, role FROM users ORDER BY username")
        .fetch_all(pool)
        .await
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: &str,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)")
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .execute(pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
