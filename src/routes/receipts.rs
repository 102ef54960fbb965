use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::require_user;
use crate::error::{AppError, AppResult};
use crate::repository::email_log::{self, NewEmailLogEntry};
use crate::repository::{payments, properties, settings, tenants};
use crate::schemas::{validate_payload, EmailReceiptInput};
use crate::services::receipts::{render_receipt, LandlordProfile};
use crate::state::AppState;

const EMAIL_LOG_PAGE: i64 = 200;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/email-receipt", axum::routing::post(email_receipt))
        .route("/email-log", axum::routing::get(list_email_log))
}

/// Render the receipt for a property/tenant/period, append an audit row
/// and hand back a Gmail compose link. Nothing is sent from here.
async fn email_receipt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EmailReceiptInput>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    validate_payload(&payload)?;

    let not_found = || AppError::NotFound("Property or tenant not found.".to_string());
    let property = properties::get(&state.db, payload.property_id)
        .await?
        .ok_or_else(not_found)?;
    let tenant = tenants::get(&state.db, payload.tenant_id)
        .await?
        .ok_or_else(not_found)?;
    let payment = payments::find_for_period(
        &state.db,
        payload.property_id,
        payload.month,
        payload.year,
    )
    .await?;

    let landlord = LandlordProfile::from_settings(&settings::all(&state.db).await?);
    let now = Utc::now();
    let receipt = render_receipt(
        &property,
        &tenant,
        payment.as_ref(),
        payload.month,
        payload.year,
        &landlord,
        now.date_naive(),
    )
    .ok_or_else(|| AppError::BadRequest("Invalid month.".to_string()))?;

    email_log::append(
        &state.db,
        &NewEmailLogEntry {
            kind: "receipt",
            property_id: payload.property_id,
            tenant_id: payload.tenant_id,
            to_email: &tenant.email,
            month: payload.month,
            year: payload.year,
            amount: receipt.total_received,
            sent_at: now.naive_utc(),
        },
    )
    .await?;
    tracing::info!(
        property_id = payload.property_id,
        tenant_id = payload.tenant_id,
        month = payload.month,
        year = payload.year,
        "receipt rendered"
    );

    Ok(Json(json!({
        "ok": true,
        "gmailUrl": receipt.gmail_url,
        "msg": format!("Receipt ready for {}", tenant.email),
    })))
}

async fn list_email_log(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let rows = email_log::recent(&state.db, EMAIL_LOG_PAGE).await?;
    Ok(Json(json!(rows)))
}
