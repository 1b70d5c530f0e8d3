use async_trait::async_trait;
use huddle_protocol::ToolError;
use huddle_tools::{GenerationRequest, ResponseGenerator};
use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub struct FixedGenerator {
    response: String,
}

impl FixedGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ResponseGenerator for FixedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ToolError> {
        Ok(self.response.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ResponseGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ToolError> {
        Err(ToolError::Status {
            status: 503,
            body: self.message.clone(),
        })
    }
}

/// Answers with a fixed response and keeps every request it saw.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    response: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RecordingGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ResponseGenerator for RecordingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ToolError> {
        self.requests.lock().push(request.clone());
        Ok(self.response.clone())
    }
}
