use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::require_user;
use crate::error::{AppError, AppResult};
use crate::repository::{is_unique_violation, users};
use crate::schemas::{validate_payload, CreateUserInput};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/users",
            axum::routing::get(list_users).post(create_user),
        )
        .route("/users/{id}", axum::routing::delete(delete_user))
}

async fn list_users(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    let rows = users::list(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserInput>,
) -> AppResult<Json<Value>> {
    require_user(&state, &headers).await?;
    validate_payload(&payload)?;

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|_| AppError::BadRequest("Could not hash password.".to_string()))?;

    match users::create(&state.db, &payload.username, &password_hash, &payload.role).await {
        Ok(_) => Ok(Json(json!({ "ok": true }))),
        Err(error) if is_unique_violation(&error) => {
            Err(AppError::Conflict("Username already exists.".to_string()))
        }
        Err(error) => Err(error.into()),
    }
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let current = require_user(&state, &headers).await?;
    if current.id == id {
        return Err(AppError::BadRequest("Cannot delete yourself.".to_string()));
    }
    users::delete(&state.db, id).await?;
    Ok(Json(json!({ "ok": true })))
}
