use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};

pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload
        .validate()
        .map_err(|errors| AppError::BadRequest(format!("Invalid payload: {errors}")))
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "manager".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyInput {
    #[validate(length(min = 1))]
    pub name: String,
    pub label: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub base_rent: f64,
    #[validate(length(min = 1))]
    pub tenant_name: String,
    #[validate(email)]
    pub tenant_email: String,
    pub tenant_phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePropertyInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub label: String,
    pub address: Option<String>,
    #[serde(default)]
    pub base_rent: f64,
    pub tenant_id: Option<i64>,
    pub tenant_name: Option<String>,
    #[validate(email)]
    pub tenant_email: Option<String>,
    pub tenant_phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentInput {
    pub property_id: i64,
    pub tenant_id: i64,
    #[validate(range(min = 1, max = 12))]
    pub month: i32,
    pub year: i32,
    #[serde(default)]
    pub rent_due: f64,
    #[serde(default)]
    pub rent_received: f64,
    #[serde(default)]
    pub late_fee: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseInput {
    pub property_id: i64,
    #[validate(range(min = 1, max = 12))]
    pub month: i32,
    pub year: i32,
    #[serde(default)]
    pub amount: f64,
    #[validate(length(min = 1))]
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeaseInput {
    pub tenant_id: i64,
    pub property_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub rent_amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailReceiptInput {
    pub property_id: i64,
    pub tenant_id: i64,
    #[validate(range(min = 1, max = 12))]
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct PropertyYearQuery {
    pub property_id: i64,
    pub year: i32,
}
