use async_trait::async_trait;
use huddle_protocol::{Member, WorkspaceInfo};
use huddle_tools::{MemberResolver, MembershipError};

/// One workspace with a fixed member list.
#[derive(Debug, Clone)]
pub struct StaticMembers {
    workspace: WorkspaceInfo,
    members: Vec<String>,
}

impl StaticMembers {
    pub fn new(workspace_id: &str, name: &str, members: &[&str]) -> Self {
        Self {
            workspace: WorkspaceInfo {
                id: workspace_id.to_string(),
                name: name.to_string(),
            },
            members: members.iter().map(|member| member.to_string()).collect(),
        }
    }
}

#[async_trait]
impl MemberResolver for StaticMembers {
    async fn resolve_member(&self, workspace_id: &str, user_id: &str) -> Result<Member, MembershipError> {
        if user_id.is_empty() || workspace_id != self.workspace.id {
            return Err(MembershipError::Unauthorized("no session".to_string()));
        }
        if !self.members.iter().any(|member| member == user_id) {
            return Err(MembershipError::NotAMember {
                workspace_id: workspace_id.to_string(),
                participant_id: user_id.to_string(),
            });
        }
        Ok(Member {
            workspace_id: workspace_id.to_string(),
            participant_id: user_id.to_string(),
            name: Some(user_id.to_string()),
        })
    }

    async fn workspace_info(&self, _workspace_id: &str) -> Result<WorkspaceInfo, MembershipError> {
        Ok(self.workspace.clone())
    }
}
