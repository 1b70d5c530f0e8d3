//! Shared state injected into every handler.

use crate::error::ServerError;
use axum::http::{HeaderMap, HeaderName};
use huddle_config::ServerConfig;
use huddle_core::Assistant;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant,
    member_header: HeaderName,
}

impl AppState {
    pub fn new(assistant: Assistant, config: &ServerConfig) -> Result<Self, ServerError> {
        let member_header = HeaderName::from_bytes(config.member_header.as_bytes()).map_err(|err| {
            ServerError::InvalidConfig(format!(
                "server.member_header `{}`: {err}",
                config.member_header
            ))
        })?;
        Ok(Self {
            assistant,
            member_header,
        })
    }

    /// Participant id carried by the member header; empty when absent.
    pub fn member_id(&self, headers: &HeaderMap) -> String {
        headers
            .get(&self.member_header)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

