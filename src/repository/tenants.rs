use sqlx::SqlitePool;

use crate::models::Tenant;

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_contact(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    email: &str,
    phone: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE tenants SET name = ?, email = ?, phone = ? WHERE id = ?")
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
