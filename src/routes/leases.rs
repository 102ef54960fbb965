use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::auth::require_user;
use crate::error::AppResult;
use crate::repository::leases;
use crate::schemas::CreateLeaseInput;
use crate::state::AppState;

const ALERT_HORIZON_DAYS: i64 = 60;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/leases",
            axum::routing::get(list_leases).post(create_lease),
        )
        .route("/leases/alerts", axum::routing::get(lease_alerts))
}

async fn list_leases(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let rows = leases::roster(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn create_lease(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLeaseInput>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let id = leases::create_active(&state.db, &payload).await?;
    tracing::info!(lease_id = id, tenant_id = payload.tenant_id, "lease activated");
    Ok(Json(json!({ "ok": true })))
}

async fn lease_alerts(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let today = Utc::now().date_naive();
    let horizon = today + Duration::days(ALERT_HORIZON_DAYS);
    let rows = leases::expiring_between(&state.db, today, horizon).await?;
    Ok(Json(json!(rows)))
}
