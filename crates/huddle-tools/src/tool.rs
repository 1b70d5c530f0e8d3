//! Specialized tool integrations (GitHub, Gmail, ...).

use crate::http::{require_url, send_json};
use async_trait::async_trait;
use huddle_protocol::{Intent, NavigationAction, ToolError};
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Request forwarded to a specialized tool endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest {
    pub intent: Intent,
    pub message: String,
    pub workspace_context: String,
    pub workspace_id: String,
}

/// Successful tool result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub response: String,
    pub actions: Vec<NavigationAction>,
}

/// External integration that handles a specialized intent end to end.
///
/// Any failure, including a payload with `success: false`, is returned as an
/// error so the caller can fall through to generic retrieval.
#[async_trait]
pub trait ToolEndpoint: Send + Sync {
    async fn execute(&self, request: &ToolRequest) -> Result<ToolReply, ToolError>;
}

#[derive(Debug, Deserialize)]
struct ToolPayload {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    actions: Vec<NavigationAction>,
    #[serde(default)]
    error: Option<String>,
}

/// Tool endpoint reached with an HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpToolEndpoint {
    client: Client,
    url: Option<String>,
}

impl HttpToolEndpoint {
    pub fn new(client: Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ToolEndpoint for HttpToolEndpoint {
    async fn execute(&self, request: &ToolRequest) -> Result<ToolReply, ToolError> {
        let url = require_url(&self.url, "tool")?;
        info!(
            "calling tool endpoint (intent={}, workspace_id={}, message_len={})",
            request.intent,
            request.workspace_id,
            request.message.len()
        );
        let payload: ToolPayload = send_json(self.client.post(url).json(request), "tool").await?;
        into_reply(payload)
    }
}

fn into_reply(payload: ToolPayload) -> Result<ToolReply, ToolError> {
    if !payload.success {
        return Err(ToolError::Rejected(
            payload
                .error
                .unwrap_or_else(|| "tool reported failure".to_string()),
        ));
    }
    match payload.response {
        Some(response) if !response.trim().is_empty() => Ok(ToolReply {
            response,
            actions: payload.actions,
        }),
        _ => Err(ToolError::Decode("tool response missing text".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ToolPayload {
        serde_json::from_value(value).expect("payload")
    }

    #[test]
    fn request_uses_wire_field_names() {
        let request = ToolRequest {
            intent: Intent::ToolGithub,
            message: "open an issue".to_string(),
            workspace_context: "Workspace: Design (ws-1)".to_string(),
            workspace_id: "ws-1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({
                "intent": "tool:github",
                "message": "open an issue",
                "workspaceContext": "Workspace: Design (ws-1)",
                "workspaceId": "ws-1"
            })
        );
    }

    #[test]
    fn failure_flag_is_an_error() {
        let err = into_reply(payload(json!({ "success": false, "error": "token expired" })))
            .unwrap_err();
        assert!(matches!(err, ToolError::Rejected(message) if message == "token expired"));
    }

    #[test]
    fn success_without_text_is_malformed() {
        let err = into_reply(payload(json!({ "success": true }))).unwrap_err();
        assert!(matches!(err, ToolError::Decode(_)));
    }

    #[test]
    fn success_keeps_actions() {
        let reply = into_reply(payload(json!({
            "success": true,
            "response": "Created issue #12",
            "actions": [{ "label": "Open Chats", "type": "chats", "url": "/workspace/{workspaceId}/chats" }]
        })))
        .expect("reply");
        assert_eq!(reply.response, "Created issue #12");
        assert_eq!(reply.actions.len(), 1);
    }
}
