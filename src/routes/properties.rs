use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::require_user;
use crate::error::{AppError, AppResult};
use crate::repository::{properties, tenants};
use crate::schemas::{validate_payload, CreatePropertyInput, UpdatePropertyInput};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/properties",
            axum::routing::get(list_properties).post(create_property),
        )
        .route(
            "/properties/{id}",
            axum::routing::put(update_property).delete(delete_property),
        )
}

async fn list_properties(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let rows = properties::list_overviews(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn create_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePropertyInput>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    validate_payload(&payload)?;

    let id = properties::create_with_tenant(&state.db, &payload).await?;
    tracing::info!(property_id = id, name = %payload.name, "property created");
    Ok(Json(json!({ "ok": true, "id": id })))
}

async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePropertyInput>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    validate_payload(&payload)?;

    properties::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found.".to_string()))?;
    properties::update(&state.db, id, &payload).await?;

    if let Some(tenant_id) = payload.tenant_id {
        tenants::update_contact(
            &state.db,
            tenant_id,
            payload.tenant_name.as_deref().unwrap_or(""),
            payload.tenant_email.as_deref().unwrap_or(""),
            payload.tenant_phone.as_deref().unwrap_or(""),
        )
        .await?;
    }

    Ok(Json(json!({ "ok": true })))
}

async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    properties::delete_cascade(&state.db, id).await?;
    tracing::info!(property_id = id, "property deleted with payments, expenses and tenants");
    Ok(Json(json!({ "ok": true })))
}
