use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{self, SessionUser};
use crate::error::{AppError, AppResult};
use crate::repository::users;
use crate::schemas::LoginInput;
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/login", axum::routing::post(login))
        .route("/logout", axum::routing::post(logout))
        .route("/me", axum::routing::get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginInput>,
) -> AppResult<Json<Value>> {
    let invalid = || AppError::Unauthorized("Invalid username or password.".to_string());

    let user = users::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or_else(invalid)?;
    let verified =
        bcrypt::verify(&payload.password, &user.password_hash).map_err(|_| invalid())?;
    if !verified {
        return Err(invalid());
    }

    let session_user = SessionUser::from(&user);
    let token = auth::start_session(&state, session_user.clone()).await;
    tracing::info!(username = %session_user.username, "user logged in");
    Ok(Json(json!({ "ok": true, "token": token, "user": session_user })))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    auth::end_session(&state, &headers).await;
    Json(json!({ "ok": true }))
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    match auth::current_user(&state, &headers).await {
        Some(user) => Json(json!(user)),
        None => Json(Value::Null),
    }
}
