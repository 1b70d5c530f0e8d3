//! Collaborator interfaces consumed by the assistant pipeline.
//!
//! Each external dependency is a trait so the pipeline receives typed handles
//! instead of looking services up by name. HTTP implementations backed by
//! `reqwest` are provided for deployment; test doubles live in
//! `huddle-test-utils`.

pub mod calendar;
pub mod generator;
pub mod http;
pub mod member;
pub mod search;
pub mod tool;

/// Calendar-like event lookup.
pub use calendar::{CalendarLookup, HttpCalendarLookup};
/// Free-text response generation.
pub use generator::{GenerationRequest, HttpGenerator, ResponseGenerator};
/// Shared HTTP client construction.
pub use http::HttpCollaborators;
/// Member resolution.
pub use member::{MemberResolver, MembershipError, RosterMemberResolver};
/// Workspace content search.
pub use search::{HttpWorkspaceSearch, WorkspaceSearch};
/// Specialized tool integrations.
pub use tool::{HttpToolEndpoint, ToolEndpoint, ToolReply, ToolRequest};
