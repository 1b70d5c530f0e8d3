//! Member resolution for the asking user.

use async_trait::async_trait;
use huddle_config::WorkspaceRoster;
use huddle_protocol::{Member, WorkspaceInfo};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

/// Why a user could not be resolved to a workspace member.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MembershipError {
    /// No authenticated user, or the workspace is unknown.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Authenticated, but not a participant of the workspace.
    #[error("user {participant_id} is not a member of workspace {workspace_id}")]
    NotAMember {
        workspace_id: String,
        participant_id: String,
    },
}

/// Resolves the asking user and describes the workspace.
#[async_trait]
pub trait MemberResolver: Send + Sync {
    /// Resolve `user_id` to a member of `workspace_id`.
    async fn resolve_member(&self, workspace_id: &str, user_id: &str) -> Result<Member, MembershipError>;

    /// Workspace metadata attached to specialized tool calls.
    async fn workspace_info(&self, workspace_id: &str) -> Result<WorkspaceInfo, MembershipError>;
}

/// Resolver backed by the `workspaces` roster in configuration.
#[derive(Debug, Clone, Default)]
pub struct RosterMemberResolver {
    workspaces: HashMap<String, WorkspaceRoster>,
}

impl RosterMemberResolver {
    pub fn new(rosters: impl IntoIterator<Item = WorkspaceRoster>) -> Self {
        Self {
            workspaces: rosters
                .into_iter()
                .map(|roster| (roster.id.clone(), roster))
                .collect(),
        }
    }

    fn roster(&self, workspace_id: &str) -> Result<&WorkspaceRoster, MembershipError> {
        self.workspaces
            .get(workspace_id)
            .ok_or_else(|| MembershipError::Unauthorized(format!("unknown workspace {workspace_id}")))
    }
}

#[async_trait]
impl MemberResolver for RosterMemberResolver {
    async fn resolve_member(&self, workspace_id: &str, user_id: &str) -> Result<Member, MembershipError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(MembershipError::Unauthorized("missing user".to_string()));
        }
        let roster = self.roster(workspace_id)?;
        if !roster.members.iter().any(|member| member == user_id) {
            debug!(
                "membership check failed (workspace_id={}, participant_id={})",
                workspace_id, user_id
            );
            return Err(MembershipError::NotAMember {
                workspace_id: workspace_id.to_string(),
                participant_id: user_id.to_string(),
            });
        }
        Ok(Member {
            workspace_id: workspace_id.to_string(),
            participant_id: user_id.to_string(),
            name: None,
        })
    }

    async fn workspace_info(&self, workspace_id: &str) -> Result<WorkspaceInfo, MembershipError> {
        let roster = self.roster(workspace_id)?;
        Ok(WorkspaceInfo {
            id: roster.id.clone(),
            name: roster.name.clone(),
        })
    }
}
