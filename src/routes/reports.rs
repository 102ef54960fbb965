use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::require_user;
use crate::error::AppResult;
use crate::schemas::YearQuery;
use crate::services::reports;
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/dashboard", axum::routing::get(dashboard))
        .route("/taxreport", axum::routing::get(tax_report))
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let report = reports::dashboard(&state.db, query.year).await?;
    Ok(Json(json!(report)))
}

async fn tax_report(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let report = reports::tax_report(&state.db, query.year).await?;
    Ok(Json(json!(report)))
}
