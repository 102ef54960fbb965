use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::require_user;
use crate::error::AppResult;
use crate::repository::expenses;
use crate::schemas::{validate_payload, CreateExpenseInput, PropertyYearQuery};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/expenses",
            axum::routing::get(list_expenses).post(create_expense),
        )
        .route("/expenses/{id}", axum::routing::delete(delete_expense))
}

async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<PropertyYearQuery>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let rows = expenses::list_for_year(&state.db, query.property_id, query.year).await?;
    Ok(Json(json!(rows)))
}

async fn create_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateExpenseInput>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    validate_payload(&payload)?;

    expenses::create(&state.db, &payload, Utc::now().date_naive()).await?;
    Ok(Json(json!({ "ok": true })))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    expenses::delete(&state.db, id).await?;
    Ok(Json(json!({ "ok": true })))
}
