use std::collections::BTreeMap;

use sqlx::{Row, SqlitePool};

pub async fn all(pool: &SqlitePool) -> Result<BTreeMap<String, String>, sqlx::Error> {
    let rows = sqlx::query("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;
    let mut map = BTreeMap::new();
    for row in rows {
        map.insert(row.try_get("key")?, row.try_get("value")?);
    }
    Ok(map)
}

pub async fn upsert(pool: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}
