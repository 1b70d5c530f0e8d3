//! Wire and data types shared across the Huddle assistant crates.

mod intent;
mod retrieval;
mod tool;

pub use intent::Intent;
pub use retrieval::{
    CardHit, EventHit, EventMessage, MessageHit, NoteHit, OtherHit, RetrievalResult, TaskHit,
};
pub use tool::ToolError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a team workspace.
pub type WorkspaceId = String;
/// Identifier of a workspace participant (the asking user).
pub type ParticipantId = String;

/// Placeholder substituted with the workspace id in action url templates.
pub const WORKSPACE_PLACEHOLDER: &str = "{workspaceId}";

/// Speaker role for a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored message.
    User,
    /// Assistant-authored message.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Message stored in a conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role that produced the message.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Timestamp for the message.
    pub timestamp: DateTime<Utc>,
    /// Citable sources attached to an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    /// Suggested navigation actions attached to an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NavigationAction>,
}

impl ChatMessage {
    /// Build a user message.
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
            sources: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Build an assistant message without sources or actions.
    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
            sources: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Attach sources and actions to the message.
    pub fn with_attachments(mut self, sources: Vec<Source>, actions: Vec<NavigationAction>) -> Self {
        self.sources = sources;
        self.actions = actions;
        self
    }
}

/// Entity kind a source was derived from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Chat message.
    Message,
    /// Task item.
    Task,
    /// Note page.
    Note,
    /// Board card.
    Card,
    /// Calendar-like event.
    Event,
    /// Any other titled workspace record.
    Document,
}

impl SourceKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Message => "message",
            SourceKind::Task => "task",
            SourceKind::Note => "note",
            SourceKind::Card => "card",
            SourceKind::Event => "event",
            SourceKind::Document => "document",
        }
    }
}

/// Citable source derived from a retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// Identifier of the originating record.
    pub id: String,
    /// Kind of the originating record.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Display text, truncated with an ellipsis marker.
    pub text: String,
}

/// Destination kind for a suggested navigation action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Calendar view.
    Calendar,
    /// Notes view.
    Notes,
    /// Boards view.
    Boards,
    /// Chats view.
    Chats,
}

impl ActionKind {
    /// Return the destination as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Calendar => "calendar",
            ActionKind::Notes => "notes",
            ActionKind::Boards => "boards",
            ActionKind::Chats => "chats",
        }
    }
}

/// Suggested UI destination derived from retrieved content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationAction {
    /// Button label.
    pub label: String,
    /// Destination kind.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Url template containing the `{workspaceId}` placeholder.
    pub url: String,
}

impl NavigationAction {
    /// Default action for a destination kind.
    pub fn for_kind(kind: ActionKind) -> Self {
        let (label, path) = match kind {
            ActionKind::Calendar => ("View Calendar", "calendar"),
            ActionKind::Notes => ("Open Notes", "notes"),
            ActionKind::Boards => ("View Boards", "boards"),
            ActionKind::Chats => ("Open Chats", "chats"),
        };
        Self {
            label: label.to_string(),
            kind,
            url: format!("/workspace/{WORKSPACE_PLACEHOLDER}/{path}"),
        }
    }

    /// Substitute the workspace id into the url template.
    pub fn resolve_url(&self, workspace_id: &str) -> String {
        self.url.replace(WORKSPACE_PLACEHOLDER, workspace_id)
    }
}

/// Resolved workspace membership for the asking user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    /// Workspace the member belongs to.
    pub workspace_id: WorkspaceId,
    /// Participant identifier used to key conversation history.
    pub participant_id: ParticipantId,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Workspace metadata attached to external calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceInfo {
    /// Workspace identifier.
    pub id: WorkspaceId,
    /// Human-friendly workspace name.
    pub name: String,
}

impl WorkspaceInfo {
    /// Render the workspace description sent to the specialized tool endpoint.
    pub fn render_context(&self, member: &Member) -> String {
        let who = member.name.as_deref().unwrap_or(&member.participant_id);
        format!("Workspace: {} ({})\nRequested by: {}", self.name, self.id, who)
    }
}

/// Result of one assistant request, returned to the caller in-band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AssistantReply {
    /// Response text shown to the user.
    pub response: String,
    /// Citable sources backing the response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    /// Suggested navigation actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NavigationAction>,
    /// Internal failure description when the response is degraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssistantReply {
    /// Reply carrying only response text.
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    /// Degraded reply carrying an error description.
    pub fn degraded(response: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Convert the reply into the assistant message appended to history.
    pub fn to_message(&self, timestamp: DateTime<Utc>) -> ChatMessage {
        ChatMessage::assistant(self.response.clone(), timestamp)
            .with_attachments(self.sources.clone(), self.actions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn navigation_action_resolves_workspace_placeholder() {
        let action = NavigationAction::for_kind(ActionKind::Boards);
        assert_eq!(action.url, "/workspace/{workspaceId}/boards");
        assert_eq!(action.resolve_url("ws_42"), "/workspace/ws_42/boards");
    }

    #[test]
    fn assistant_reply_omits_empty_fields() {
        let reply = AssistantReply::text("hello");
        let encoded = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(encoded, json!({ "response": "hello" }));

        let degraded = AssistantReply::degraded("sorry", "generator returned 502");
        let encoded = serde_json::to_value(&degraded).expect("serialize");
        assert_eq!(
            encoded,
            json!({ "response": "sorry", "error": "generator returned 502" })
        );
    }

    #[test]
    fn chat_message_serializes_sources_with_type_tag() {
        let timestamp = Utc::now();
        let message = ChatMessage::assistant("see task", timestamp).with_attachments(
            vec![Source {
                id: "t1".to_string(),
                kind: SourceKind::Task,
                text: "Ship release".to_string(),
            }],
            vec![NavigationAction::for_kind(ActionKind::Calendar)],
        );
        let encoded = serde_json::to_value(&message).expect("serialize");
        assert_eq!(encoded["role"], json!("assistant"));
        assert_eq!(encoded["sources"][0]["type"], json!("task"));
        assert_eq!(encoded["actions"][0]["type"], json!("calendar"));

        let decoded: ChatMessage = serde_json::from_value(encoded).expect("deserialize");
        assert_eq!(decoded, message);
    }

    #[test]
    fn workspace_context_prefers_member_name() {
        let info = WorkspaceInfo {
            id: "ws".to_string(),
            name: "Design".to_string(),
        };
        let member = Member {
            workspace_id: "ws".to_string(),
            participant_id: "u1".to_string(),
            name: Some("Ada".to_string()),
        };
        assert_eq!(
            info.render_context(&member),
            "Workspace: Design (ws)\nRequested by: Ada"
        );
    }
}
