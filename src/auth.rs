use axum::http::HeaderMap;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;

const SESSION_HEADER: &str = "x-session-token";

#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// Mint an opaque session token and register it in the TTL cache.
pub async fn start_session(state: &AppState, user: SessionUser) -> String {
    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), user).await;
    token
}

pub async fn end_session(state: &AppState, headers: &HeaderMap) {
    if let Some(token) = session_token(headers) {
        state.sessions.invalidate(&token).await;
    }
}

pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<SessionUser> {
    let token = session_token(headers)?;
    state.sessions.get(&token).await
}

pub async fn require_user(state: &AppState, headers: &HeaderMap) -> AppResult<SessionUser> {
    current_user(state, headers)
        .await
        .ok_or_else(|| AppError::Unauthorized("Not logged in.".to_string()))
}

/// Accepts `Authorization: Bearer <token>` or the `x-session-token` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return Some(token.to_string());
    }
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
