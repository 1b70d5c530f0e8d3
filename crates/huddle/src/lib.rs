//! Public surface for Huddle.
//!
//! Re-exports the workspace crates and wires a ready-to-serve [`Assistant`]
//! from a loaded [`HuddleConfig`].

/// Re-export for convenience.
pub use huddle_config as config;
pub use huddle_core as core;
/// Re-export for convenience.
pub use huddle_history as history;
/// Re-export for convenience.
pub use huddle_protocol as protocol;
pub use huddle_server as server;
pub use huddle_tools as tools;

use huddle_config::HuddleConfig;
use huddle_core::{Assistant, Collaborators};
use huddle_history::{ChatHistoryStore, HistoryError, RetryPolicy, open_document_store};
use huddle_protocol::ToolError;
use huddle_tools::{HttpCollaborators, RosterMemberResolver};
use log::info;
use std::sync::Arc;
use thiserror::Error;

/// Failures while assembling the assistant from config.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to build http collaborators: {0}")]
    Collaborators(#[from] ToolError),
    #[error("failed to open history store: {0}")]
    History(#[from] HistoryError),
}

#[inline]
/// Initialize logging with env_logger; `RUST_LOG` controls the level.
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}

/// Build the assistant with HTTP collaborators, the configured roster and the
/// configured history store.
pub fn assistant_from_config(config: &HuddleConfig) -> Result<Assistant, BootstrapError> {
    let http = HttpCollaborators::from_config(&config.endpoints)?;
    let collaborators = Collaborators {
        members: Arc::new(RosterMemberResolver::new(config.workspaces.clone())),
        search: Arc::new(http.search),
        calendar: Arc::new(http.calendar),
        tools: Arc::new(http.tool),
        generator: Arc::new(http.generator),
    };
    let store = open_document_store(&config.history)?;
    let history = ChatHistoryStore::new(
        store,
        RetryPolicy::from(&config.history),
        config.assistant.greeting.clone(),
    );
    info!(
        "assistant wired (workspaces={}, history_provider={:?})",
        config.workspaces.len(),
        config.history.provider
    );
    Ok(Assistant::new(collaborators, history, config))
}
