use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use entity::usuario;

use crate::auth::{self, LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let resp = auth::login(&state.db, state.config.auth.session_ttl_secs, &req).await?;
    tracing::info!(user = %resp.user.username, "sesión iniciada");
    Ok(Json(resp))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth::logout(&state.db, &headers).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Who am I. Lets the client pick the dashboard without decoding anything
/// out of the token.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<usuario::Model>, ApiError> {
    let current = auth::authenticate(&state.db, &headers).await?;
    Ok(Json(current.user))
}
