use crate::error::ServerError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use huddle_core::HuddleCoreError;
use huddle_protocol::AssistantReply;
use log::warn;
use serde::Deserialize;
use std::sync::Arc;

/// Shown in place of the storage error, which stays in the server log.
const UNSAVED_NOTICE: &str = "conversation was not saved";

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/assistant", post(ask))
}

/// Answer one question. A reply that could not be recorded is still
/// returned, with `error` set.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<AskRequest>,
) -> Result<Json<AssistantReply>, ServerError> {
    let user_id = state.member_id(&headers);
    match state
        .assistant
        .generate_response(&workspace_id, &user_id, &request.message)
        .await
    {
        Ok(reply) => Ok(Json(reply)),
        Err(HuddleCoreError::HistoryNotPersisted { reply, source }) => {
            warn!(
                "returning unrecorded reply (workspace_id={}, error={})",
                workspace_id, source
            );
            let mut reply = *reply;
            if reply.error.is_none() {
                reply.error = Some(UNSAVED_NOTICE.to_string());
            }
            Ok(Json(reply))
        }
        Err(err) => Err(err.into()),
    }
}
