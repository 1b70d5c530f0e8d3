//! Server error type and its HTTP mapping.
//!
//! Client errors expose their message; internal errors are logged in full and
//! answered with a generic body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use huddle_core::HuddleCoreError;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid server config: {0}")]
    InvalidConfig(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<HuddleCoreError> for ServerError {
    fn from(err: HuddleCoreError) -> Self {
        match err {
            HuddleCoreError::Unauthorized(message) => ServerError::Unauthorized(message),
            HuddleCoreError::NotAMember { .. } => ServerError::Forbidden(err.to_string()),
            HuddleCoreError::InvalidRequest(message) => ServerError::BadRequest(message),
            HuddleCoreError::HistoryNotPersisted { .. } | HuddleCoreError::History(_) => {
                ServerError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            ServerError::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            ServerError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ServerError::InvalidConfig(message) | ServerError::Internal(message) => {
                error!("request failed (error={})", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_history::HistoryError;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_core_errors_to_statuses() {
        let cases = [
            (
                HuddleCoreError::Unauthorized("no session".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                HuddleCoreError::NotAMember {
                    workspace_id: "ws".to_string(),
                    participant_id: "eve".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                HuddleCoreError::InvalidRequest("message cannot be empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                HuddleCoreError::History(HistoryError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let response = ServerError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
