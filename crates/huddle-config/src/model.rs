//! Configuration schema for Huddle.

use serde::{Deserialize, Serialize};

/// Root config for the Huddle assistant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HuddleConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub workspaces: Vec<WorkspaceRoster>,
}

impl HuddleConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> HuddleConfigBuilder {
        HuddleConfigBuilder::new()
    }
}

/// Builder for assembling a `HuddleConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct HuddleConfigBuilder {
    config: HuddleConfig,
}

impl HuddleConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: HuddleConfig::default(),
        }
    }

    /// Replace the assistant wording and prompt settings.
    pub fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    /// Replace the retrieval limits.
    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.config.retrieval = retrieval;
        self
    }

    /// Replace the conversation history settings.
    pub fn history(mut self, history: HistoryConfig) -> Self {
        self.config.history = history;
        self
    }

    /// Replace the collaborator endpoints.
    pub fn endpoints(mut self, endpoints: EndpointsConfig) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    /// Replace the HTTP server settings.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Add a workspace roster entry.
    pub fn workspace(mut self, roster: WorkspaceRoster) -> Self {
        self.config.workspaces.push(roster);
        self
    }

    /// Finalize and return the built `HuddleConfig`.
    pub fn build(self) -> HuddleConfig {
        self.config
    }
}

/// Assistant wording and prompt shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Replaces the default persona preamble when set.
    #[serde(default)]
    pub persona: Option<String>,
    /// Number of prior history messages included in the prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Display length of source snippets before truncation.
    #[serde(default = "default_source_text_chars")]
    pub source_text_chars: usize,
    /// Message written by a history reset.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Response used when retrieval finds nothing relevant.
    #[serde(default = "default_no_information_message")]
    pub no_information_message: String,
    /// Response used when generation fails.
    #[serde(default = "default_apology_message")]
    pub apology_message: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona: None,
            history_window: default_history_window(),
            source_text_chars: default_source_text_chars(),
            greeting: default_greeting(),
            no_information_message: default_no_information_message(),
            apology_message: default_apology_message(),
        }
    }
}

fn default_history_window() -> usize {
    5
}

fn default_source_text_chars() -> usize {
    100
}

fn default_greeting() -> String {
    "Hi! I'm your workspace assistant. Ask me about messages, tasks, notes, boards or upcoming meetings."
        .to_string()
}

fn default_no_information_message() -> String {
    "I don't have information about that in this workspace yet.".to_string()
}

fn default_apology_message() -> String {
    "I'm sorry, I ran into a problem while answering. Please try again.".to_string()
}

/// Result caps for each retrieval path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Cap for the generic multi-domain search.
    #[serde(default = "default_generic_limit")]
    pub generic_limit: usize,
    /// Cap for the generic search when reached as a fallback.
    #[serde(default = "default_fallback_limit")]
    pub fallback_limit: usize,
    /// Cap for calendar events kept after date filtering.
    #[serde(default = "default_calendar_limit")]
    pub calendar_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            generic_limit: default_generic_limit(),
            fallback_limit: default_fallback_limit(),
            calendar_limit: default_calendar_limit(),
        }
    }
}

fn default_generic_limit() -> usize {
    8
}

fn default_fallback_limit() -> usize {
    5
}

fn default_calendar_limit() -> usize {
    5
}

/// Backing store for conversation histories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HistoryProvider {
    /// Process-local store, lost on restart.
    #[default]
    Memory,
    /// One JSON document per participant under `history.path`.
    File,
}

/// Conversation history persistence and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default)]
    pub provider: HistoryProvider,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_min_ms")]
    pub backoff_min_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            provider: HistoryProvider::default(),
            path: None,
            max_attempts: default_max_attempts(),
            backoff_min_ms: default_backoff_min_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_min_ms() -> u64 {
    50
}

fn default_backoff_max_ms() -> u64 {
    150
}

/// External collaborator endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointsConfig {
    #[serde(default)]
    pub search_url: Option<String>,
    #[serde(default)]
    pub calendar_url: Option<String>,
    #[serde(default)]
    pub tool_url: Option<String>,
    #[serde(default)]
    pub generator_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            search_url: None,
            calendar_url: None,
            tool_url: None,
            generator_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Request header carrying the asking participant id.
    #[serde(default = "default_member_header")]
    pub member_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            member_header: default_member_header(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_member_header() -> String {
    "x-huddle-user".to_string()
}

/// Workspace and its members, used by the roster member resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceRoster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}
