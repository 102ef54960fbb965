use sqlx::SqlitePool;

use crate::models::{Property, PropertyOverview};
use crate::schemas::{CreatePropertyInput, UpdatePropertyInput};

/// Load every property in name order with its current tenant denormalized.
/// The correlated subquery makes the "first active tenant by id" tie-break
/// explicit when a property somehow has several active tenants.
pub async fn list_overviews(pool: &SqlitePool) -> Result<Vec<PropertyOverview>, sqlx::Error> {
    sqlx::query_as::<_, PropertyOverview>(
        "SELECT p.id, p.name, p.label, p.address, p.base_rent,
                t.id AS tenant_id, t.name AS tenant_name,
                t.email AS tenant_email, t.phone AS tenant_phone
         FROM properties p
         LEFT JOIN tenants t ON t.id = (
             SELECT id FROM tenants
             WHERE property_id = p.id AND active = 1
             ORDER BY id LIMIT 1
         )
         ORDER BY p.name",
    )
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Property>, sqlx::Error> {
    sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Create a property together with its initial active tenant in one
/// transaction. Returns the new property id.
pub async fn create_with_tenant(
    pool: &SqlitePool,
    input: &CreatePropertyInput,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let property_id = sqlx::query(
        "INSERT INTO properties (name, label, address, base_rent) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.name)
    .bind(input.label.as_deref().unwrap_or(&input.name))
    .bind(input.address.as_deref().unwrap_or(""))
    .bind(input.base_rent)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    sqlx::query("INSERT INTO tenants (property_id, name, email, phone, active) VALUES (?, ?, ?, ?, 1)")
        .bind(property_id)
        .bind(&input.tenant_name)
        .bind(&input.tenant_email)
        .bind(input.tenant_phone.as_deref().unwrap_or(""))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(property_id)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &UpdatePropertyInput,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE properties SET name = ?, label = ?, address = ?, base_rent = ? WHERE id = ?")
        .bind(&input.name)
        .bind(&input.label)
        .bind(input.address.as_deref().unwrap_or(""))
        .bind(input.base_rent)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a property with its payments, expenses and tenants in one
/// transaction. Leases and email_log rows referencing the property are
/// intentionally left in place.
pub async fn delete_cascade(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in [
        "DELETE FROM payments WHERE property_id = ?",
        "DELETE FROM expenses WHERE property_id = ?",
        "DELETE FROM tenants WHERE property_id = ?",
        "DELETE FROM properties WHERE id = ?",
    ] {
        sqlx::query(statement).bind(id).execute(&mut *tx).await?;
    }
    tx.commit().await
}
