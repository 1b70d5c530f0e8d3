//! Shared reqwest plumbing for the HTTP collaborators.

use crate::calendar::HttpCalendarLookup;
use crate::generator::HttpGenerator;
use crate::search::HttpWorkspaceSearch;
use crate::tool::HttpToolEndpoint;
use huddle_config::EndpointsConfig;
use huddle_protocol::ToolError;
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest body excerpt kept in status errors.
const ERROR_BODY_PREVIEW: usize = 300;

/// All HTTP collaborators built from one endpoints section and one client.
#[derive(Debug, Clone)]
pub struct HttpCollaborators {
    pub search: HttpWorkspaceSearch,
    pub calendar: HttpCalendarLookup,
    pub tool: HttpToolEndpoint,
    pub generator: HttpGenerator,
}

impl HttpCollaborators {
    pub fn from_config(config: &EndpointsConfig) -> Result<Self, ToolError> {
        let client = build_client(Duration::from_secs(config.timeout_secs))?;
        info!(
            "http collaborators configured (search={}, calendar={}, tool={}, generator={})",
            config.search_url.is_some(),
            config.calendar_url.is_some(),
            config.tool_url.is_some(),
            config.generator_url.is_some()
        );
        Ok(Self {
            search: HttpWorkspaceSearch::new(client.clone(), config.search_url.clone()),
            calendar: HttpCalendarLookup::new(client.clone(), config.calendar_url.clone()),
            tool: HttpToolEndpoint::new(client.clone(), config.tool_url.clone()),
            generator: HttpGenerator::new(client, config.generator_url.clone()),
        })
    }
}

/// Build a client with a per-request timeout.
pub fn build_client(timeout: Duration) -> Result<Client, ToolError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ToolError::Transport(err.to_string()))
}

/// Resolve an optional endpoint url or report which collaborator is missing.
pub(crate) fn require_url<'a>(url: &'a Option<String>, name: &str) -> Result<&'a str, ToolError> {
    url.as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ToolError::NotConfigured(format!("{name} endpoint")))
}

/// Send a request and decode a JSON body, classifying every failure.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    endpoint: &str,
) -> Result<T, ToolError> {
    let response = request
        .send()
        .await
        .map_err(|err| ToolError::Transport(format!("{endpoint}: {err}")))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| ToolError::Transport(format!("{endpoint}: {err}")))?;
    debug!(
        "collaborator responded (endpoint={}, status={}, body_len={})",
        endpoint,
        status.as_u16(),
        body.len()
    );
    if !status.is_success() {
        return Err(ToolError::Status {
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
        });
    }
    serde_json::from_str(&body).map_err(|err| ToolError::Decode(format!("{endpoint}: {err}")))
}
