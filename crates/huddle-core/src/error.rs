//! Error types for the assistant pipeline.

use huddle_history::HistoryError;
use huddle_protocol::AssistantReply;
use huddle_tools::MembershipError;
use thiserror::Error;

/// Errors returned by [`crate::Assistant`] operations.
///
/// Retrieval and generation failures are recovered inside the pipeline and
/// never appear here.
#[derive(Debug, Error)]
pub enum HuddleCoreError {
    /// No resolved user, or the workspace is unknown.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The user is not a participant of the workspace.
    #[error("user {participant_id} is not a member of workspace {workspace_id}")]
    NotAMember {
        workspace_id: String,
        participant_id: String,
    },
    /// Request was rejected before running the pipeline.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// A reply was produced but could not be recorded in history.
    #[error("reply was not recorded in history: {source}")]
    HistoryNotPersisted {
        reply: Box<AssistantReply>,
        #[source]
        source: HistoryError,
    },
    /// History read or reset failed.
    #[error("history error: {0}")]
    History(#[from] HistoryError),
}

impl From<MembershipError> for HuddleCoreError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::Unauthorized(reason) => HuddleCoreError::Unauthorized(reason),
            MembershipError::NotAMember {
                workspace_id,
                participant_id,
            } => HuddleCoreError::NotAMember {
                workspace_id,
                participant_id,
            },
        }
    }
}
