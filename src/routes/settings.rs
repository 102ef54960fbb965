use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Map, Value};

use crate::auth::require_user;
use crate::error::AppResult;
use crate::repository::settings;
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route(
        "/settings",
        axum::routing::get(get_settings).post(save_settings),
    )
}

async fn get_settings(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let map = settings::all(&state.db).await?;
    Ok(Json(json!(map)))
}

/// Upsert every supplied key; non-string values are stored as their JSON
/// rendering.
async fn save_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    for (key, value) in &payload {
        let value = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        settings::upsert(&state.db, key, &value).await?;
    }
    Ok(Json(json!({ "ok": true })))
}
