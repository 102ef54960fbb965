use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{CategoryTotal, Expense};
use crate::schemas::CreateExpenseInput;

pub async fn list_for_year(
    pool: &SqlitePool,
    property_id: i64,
    year: i32,
) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses WHERE property_id = ? AND year = ? ORDER BY month, id",
    )
    .bind(property_id)
    .bind(year)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &SqlitePool,
    input: &CreateExpenseInput,
    expense_date: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query(
        "INSERT INTO expenses (property_id, month, year, amount, category, description, expense_date)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(input.property_id)
    .bind(input.month)
    .bind(input.year)
    .bind(input.amount)
    .bind(&input.category)
    .bind(input.description.as_deref().unwrap_or(""))
    .bind(expense_date)
    .execute(pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn total_for_year(
    pool: &SqlitePool,
    property_id: i64,
    year: i32,
) -> Result<f64, sqlx::Error> {
    let total: Option<f64> = sqlx::query_scalar(
        "SELECT SUM(amount) FROM expenses WHERE property_id = ? AND year = ?",
    )
    .bind(property_id)
    .bind(year)
    .fetch_one(pool)
    .await?;
    Ok(total.unwrap_or(0.0))
}

pub async fn category_totals_for_property(
    pool: &SqlitePool,
    property_id: i64,
    year: i32,
) -> Result<Vec<CategoryTotal>, sqlx::Error> {
    sqlx::query_as::<_, CategoryTotal>(
        "SELECT category, SUM(amount) AS total
         FROM expenses WHERE property_id = ? AND year = ?
         GROUP BY category",
    )
    .bind(property_id)
    .bind(year)
    .fetch_all(pool)
    .await
}

/// Portfolio-wide category totals for a year, largest first. Queried
/// independently of the per-property breakdowns.
pub async fn category_totals_for_year(
    pool: &SqlitePool,
    year: i32,
) -> Result<Vec<CategoryTotal>, sqlx::Error> {
    sqlx::query_as::<_, CategoryTotal>(
        "SELECT category, SUM(amount) AS total
         FROM expenses WHERE year = ?
         GROUP BY category
         ORDER BY total DESC",
    )
    .bind(year)
    .fetch_all(pool)
    .await
}
