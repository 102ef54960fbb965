use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::require_user;
use crate::error::AppResult;
use crate::repository::payments;
use crate::schemas::{validate_payload, PropertyYearQuery, RecordPaymentInput};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route(
        "/payments",
        axum::routing::get(list_payments).post(record_payment),
    )
}

async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PropertyYearQuery>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let rows = payments::list_for_year(&state.db, query.property_id, query.year).await?;
    Ok(Json(json!(rows)))
}

async fn record_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RecordPaymentInput>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    validate_payload(&payload)?;

    payments::upsert(&state.db, &payload, Utc::now().date_naive()).await?;
    tracing::info!(
        property_id = payload.property_id,
        month = payload.month,
        year = payload.year,
        "payment recorded"
    );
    Ok(Json(json!({ "ok": true })))
}
