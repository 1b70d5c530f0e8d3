//! Persisted history document and its addressing key.

use chrono::{DateTime, Utc};
use huddle_protocol::{ChatMessage, ParticipantId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the single history document of a participant in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryKey {
    pub workspace_id: WorkspaceId,
    pub participant_id: ParticipantId,
}

impl HistoryKey {
    pub fn new(workspace_id: impl Into<WorkspaceId>, participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            participant_id: participant_id.into(),
        }
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace_id, self.participant_id)
    }
}

/// Ordered chat log for one (workspace, participant) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDocument {
    pub workspace_id: WorkspaceId,
    pub participant_id: ParticipantId,
    /// Messages in insertion order.
    pub messages: Vec<ChatMessage>,
    /// Time of the last successful mutation.
    pub updated_at: DateTime<Utc>,
}

impl HistoryDocument {
    /// A new document holding a single message.
    pub fn first(key: &HistoryKey, message: ChatMessage, updated_at: DateTime<Utc>) -> Self {
        Self {
            workspace_id: key.workspace_id.clone(),
            participant_id: key.participant_id.clone(),
            messages: vec![message],
            updated_at,
        }
    }
}

/// A stored value tagged with the version it was written at.
///
/// Versions start at 1 and increase by one on every successful save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}
