use crate::error::ServerError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use huddle_protocol::ChatMessage;
use serde_json::{Value, json};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/history", get(get_history))
        .route("/history/reset", post(reset_history))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatMessage>>, ServerError> {
    let user_id = state.member_id(&headers);
    let messages = state.assistant.history(&workspace_id, &user_id).await?;
    Ok(Json(messages))
}

/// Reset the caller's history to the greeting. `existed` reports whether
/// there was anything to reset.
pub async fn reset_history(
    State(state): State<Arc<AppState>>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ServerError> {
    let user_id = state.member_id(&headers);
    let existed = state.assistant.reset_history(&workspace_id, &user_id).await?;
    Ok(Json(json!({ "reset": true, "existed": existed })))
}
