use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::models::EmailLogView;

pub struct NewEmailLogEntry<'a> {
    pub kind: &'a str,
    pub property_id: i64,
    pub tenant_id: i64,
    pub to_email: &'a str,
    pub month: i32,
    pub year: i32,
    pub amount: f64,
    pub sent_at: NaiveDateTime,
}

pub async fn append(pool: &SqlitePool, entry: &NewEmailLogEntry<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO email_log (type, property_id, tenant_id, to_email, month, year, amount, sent_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.kind)
    .bind(entry.property_id)
    .bind(entry.tenant_id)
    .bind(entry.to_email)
    .bind(entry.month)
    .bind(entry.year)
    .bind(entry.amount)
    .bind(entry.sent_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Newest entries first, enriched with display names. Orphaned rows (the
/// property or tenant was deleted later) render an em dash.
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<EmailLogView>, sqlx::Error> {
    sqlx::query_as::<_, EmailLogView>(
        "SELECT e.id, e.type, e.property_id, e.tenant_id, e.to_email,
                e.month, e.year, e.amount, e.sent_at,
                COALESCE(p.label, '—') AS prop_label,
                COALESCE(t.name, '—') AS ten_name
         FROM email_log e
         LEFT JOIN properties p ON p.id = e.property_id
         LEFT JOIN tenants t ON t.id = e.tenant_id
         ORDER BY e.sent_at DESC, e.id DESC
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
