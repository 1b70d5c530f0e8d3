/// Errors returned by external collaborators (search, calendar, tools, generator).
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Collaborator endpoint is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),
    /// Request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// Endpoint answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// Response payload could not be decoded.
    #[error("malformed payload: {0}")]
    Decode(String),
    /// Payload carried an explicit failure flag.
    #[error("rejected by endpoint: {0}")]
    Rejected(String),
}
