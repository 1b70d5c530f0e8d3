//! Free-text response generation.

use crate::http::{require_url, send_json};
use async_trait::async_trait;
use huddle_protocol::ToolError;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Request type sent for ordinary assistant answers.
pub const CHAT_REQUEST_TYPE: &str = "chat";

/// One generation call: the full prompt plus the raw assembled context.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub workspace_context: String,
    pub workspace_id: String,
}

impl GenerationRequest {
    pub fn chat(
        prompt: impl Into<String>,
        context: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: CHAT_REQUEST_TYPE.to_string(),
            message: prompt.into(),
            workspace_context: context.into(),
            workspace_id: workspace_id.into(),
        }
    }
}

/// Turns a prompt into free text; any failure is fatal to the request.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ToolError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationPayload {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    processing_time: Option<f64>,
}

/// Generator endpoint reached with an HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: Client,
    url: Option<String>,
}

impl HttpGenerator {
    pub fn new(client: Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ResponseGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ToolError> {
        let url = require_url(&self.url, "generator")?;
        info!(
            "calling generator (workspace_id={}, prompt_len={}, context_len={})",
            request.workspace_id,
            request.message.len(),
            request.workspace_context.len()
        );
        let payload: GenerationPayload =
            send_json(self.client.post(url).json(request), "generator").await?;
        if let Some(elapsed) = payload.processing_time {
            debug!("generator processing time (seconds={elapsed})");
        }
        response_text(payload)
    }
}

fn response_text(payload: GenerationPayload) -> Result<String, ToolError> {
    if !payload.success {
        return Err(ToolError::Rejected(
            payload
                .error
                .unwrap_or_else(|| "generator reported failure".to_string()),
        ));
    }
    payload
        .response
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ToolError::Decode("generator response missing text".to_string()))
}
