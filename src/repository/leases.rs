use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{LeaseAlert, LeaseRosterRow};
use crate::schemas::CreateLeaseInput;

/// Active tenants joined with their property and active lease, soonest
/// lease expiry first.
pub async fn roster(pool: &SqlitePool) -> Result<Vec<LeaseRosterRow>, sqlx::Error> {
    sqlx::query_as::<_, LeaseRosterRow>(
        "SELECT t.id, t.name, t.email, t.phone, t.property_id,
                p.label AS prop_label, p.address,
                l.id AS lease_id, l.start_date, l.end_date, l.rent_amount, l.notes
         FROM tenants t
         JOIN properties p ON p.id = t.property_id
         LEFT JOIN leases l ON l.tenant_id = t.id AND l.active = 1
         WHERE t.active = 1
         ORDER BY l.end_date ASC, p.label ASC",
    )
    .fetch_all(pool)
    .await
}

/// Deactivate any prior lease for the tenant and insert the new active
/// one as a single transaction, so the one-active-lease invariant holds
/// even under concurrent callers.
pub async fn create_active(pool: &SqlitePool, input: &CreateLeaseInput) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE leases SET active = 0 WHERE tenant_id = ?")
        .bind(input.tenant_id)
        .execute(&mut *tx)
        .await?;

    let id = sqlx::query(
        "INSERT INTO leases (tenant_id, property_id, start_date, end_date, rent_amount, notes, active)
         VALUES (?, ?, ?, ?, ?, ?, 1)",
    )
    .bind(input.tenant_id)
    .bind(input.property_id)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.rent_amount)
    .bind(input.notes.as_deref().unwrap_or(""))
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;
    Ok(id)
}

/// Active leases ending between today and the horizon, soonest first.
pub async fn expiring_between(
    pool: &SqlitePool,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<LeaseAlert>, sqlx::Error> {
    sqlx::query_as::<_, LeaseAlert>(
        "SELECT t.name AS tenant_name, p.label AS prop_label, l.end_date, l.start_date
         FROM leases l
         JOIN tenants t ON t.id = l.tenant_id
         JOIN properties p ON p.id = l.property_id
         WHERE l.active = 1 AND l.end_date <= ? AND l.end_date >= ?
         ORDER BY l.end_date ASC",
    )
    .bind(until)
    .bind(from)
    .fetch_all(pool)
    .await
}
