use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::Payment;
use crate::schemas::RecordPaymentInput;

pub async fn list_for_year(
    pool: &SqlitePool,
    property_id: i64,
    year: i32,
) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE property_id = ? AND year = ? ORDER BY month",
    )
    .bind(property_id)
    .bind(year)
    .fetch_all(pool)
    .await
}

pub async fn find_for_period(
    pool: &SqlitePool,
    property_id: i64,
    month: i32,
    year: i32,
) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE property_id = ? AND month = ? AND year = ?",
    )
    .bind(property_id)
    .bind(month)
    .bind(year)
    .fetch_optional(pool)
    .await
}

/// Atomic upsert keyed on (property_id, month, year). An existing row
/// keeps its tenant_id; rent_due, rent_received, late_fee, notes and
/// paid_date are replaced. paid_date is today while rent_received > 0,
/// NULL otherwise.
pub async fn upsert(
    pool: &SqlitePool,
    input: &RecordPaymentInput,
    today: NaiveDate,
) -> Result<(), sqlx::Error> {
    let paid_date = (input.rent_received > 0.0).then_some(today);
    sqlx::query(
        "INSERT INTO payments
            (property_id, tenant_id, month, year, rent_due, rent_received, late_fee, notes, paid_date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT (property_id, month, year) DO UPDATE SET
            rent_due = excluded.rent_due,
            rent_received = excluded.rent_received,
            late_fee = excluded.late_fee,
            notes = excluded.notes,
            paid_date = excluded.paid_date",
    )
    .bind(input.property_id)
    .bind(input.tenant_id)
    .bind(input.month)
    .bind(input.year)
    .bind(input.rent_due)
    .bind(input.rent_received)
    .bind(input.late_fee)
    .bind(input.notes.as_deref().unwrap_or(""))
    .bind(paid_date)
    .execute(pool)
    .await?;
    Ok(())
}

/// Annual cash totals over the rows that actually exist. The tax report
/// sums recorded payments only, never base-rent projections.
pub async fn received_totals_for_year(
    pool: &SqlitePool,
    property_id: i64,
    year: i32,
) -> Result<(f64, f64), sqlx::Error> {
    let row: (Option<f64>, Option<f64>) = sqlx::query_as(
        "SELECT SUM(rent_received), SUM(late_fee) FROM payments WHERE property_id = ? AND year = ?",
    )
    .bind(property_id)
    .bind(year)
    .fetch_one(pool)
    .await?;
    Ok((row.0.unwrap_or(0.0), row.1.unwrap_or(0.0)))
}
