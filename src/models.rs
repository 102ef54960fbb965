use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub address: String,
    pub base_rent: f64,
}

/// A property joined with its current tenant, where "current" means the
/// first active tenant row ordered by id.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PropertyOverview {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub address: String,
    pub base_rent: f64,
    pub tenant_id: Option<i64>,
    pub tenant_name: Option<String>,
    pub tenant_email: Option<String>,
    pub tenant_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tenant {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub active: bool,
}

/// At most one row exists per (property_id, month, year); see the unique
/// index created in `db::init_schema`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub property_id: i64,
    pub tenant_id: i64,
    pub month: i32,
    pub year: i32,
    pub rent_due: f64,
    pub rent_received: f64,
    pub late_fee: f64,
    pub notes: String,
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub property_id: i64,
    pub month: i32,
    pub year: i32,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub expense_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Active tenant with its property and active lease, for the lease roster.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaseRosterRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub property_id: i64,
    pub prop_label: String,
    pub address: String,
    pub lease_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rent_amount: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaseAlert {
    pub tenant_name: String,
    pub prop_label: String,
    pub end_date: NaiveDate,
    pub start_date: NaiveDate,
}

/// Email log row enriched with display names; orphaned references render
/// as an em dash because property deletion does not clear the log.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmailLogView {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub property_id: i64,
    pub tenant_id: i64,
    pub to_email: String,
    pub month: i32,
    pub year: i32,
    pub amount: f64,
    pub sent_at: NaiveDateTime,
    pub prop_label: String,
    pub ten_name: String,
}
