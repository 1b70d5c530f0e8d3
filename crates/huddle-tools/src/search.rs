//! Generic multi-domain workspace search.

use crate::http::{require_url, send_json};
use async_trait::async_trait;
use huddle_protocol::{RetrievalResult, ToolError};
use log::debug;
use reqwest::Client;
use serde::Serialize;

/// Ranked, best-effort search over a workspace's content.
#[async_trait]
pub trait WorkspaceSearch: Send + Sync {
    async fn search(
        &self,
        workspace_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievalResult>, ToolError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    workspace_id: &'a str,
    query: &'a str,
    limit: usize,
}

/// Search index reached over HTTP; POSTs `{ workspaceId, query, limit }`.
#[derive(Debug, Clone)]
pub struct HttpWorkspaceSearch {
    client: Client,
    url: Option<String>,
}

impl HttpWorkspaceSearch {
    pub fn new(client: Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl WorkspaceSearch for HttpWorkspaceSearch {
    async fn search(
        &self,
        workspace_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievalResult>, ToolError> {
        let url = require_url(&self.url, "search")?;
        let request = self.client.post(url).json(&SearchRequest {
            workspace_id,
            query,
            limit,
        });
        let mut hits: Vec<RetrievalResult> = send_json(request, "search").await?;
        hits.truncate(limit);
        debug!(
            "workspace search finished (workspace_id={}, hits={})",
            workspace_id,
            hits.len()
        );
        Ok(hits)
    }
}
