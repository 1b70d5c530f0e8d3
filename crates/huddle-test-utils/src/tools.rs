use async_trait::async_trait;
use huddle_protocol::{NavigationAction, ToolError};
use huddle_tools::{ToolEndpoint, ToolReply, ToolRequest};
use parking_lot::Mutex;

/// Tool endpoint that always succeeds and records requests.
#[derive(Debug, Default)]
pub struct FixedTool {
    response: String,
    actions: Vec<NavigationAction>,
    requests: Mutex<Vec<ToolRequest>>,
}

impl FixedTool {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    pub fn with_actions(mut self, actions: Vec<NavigationAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn requests(&self) -> Vec<ToolRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ToolEndpoint for FixedTool {
    async fn execute(&self, request: &ToolRequest) -> Result<ToolReply, ToolError> {
        self.requests.lock().push(request.clone());
        Ok(ToolReply {
            response: self.response.clone(),
            actions: self.actions.clone(),
        })
    }
}

/// Tool endpoint that fails with a given status and counts calls.
#[derive(Debug, Default)]
pub struct FailingTool {
    status: u16,
    calls: Mutex<u32>,
}

impl FailingTool {
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock()
    }
}

#[async_trait]
impl ToolEndpoint for FailingTool {
    async fn execute(&self, _request: &ToolRequest) -> Result<ToolReply, ToolError> {
        *self.calls.lock() += 1;
        Err(ToolError::Status {
            status: self.status,
            body: "tool unavailable".to_string(),
        })
    }
}
