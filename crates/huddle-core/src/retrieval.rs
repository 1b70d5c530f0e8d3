//! Retrieval orchestration with fallback chains.
//!
//! Order of attempts:
//! 1. specialized intents call the tool endpoint; any failure falls through;
//! 2. meeting-like queries look up this month's calendar, narrowed to today
//!    when asked; an empty or failed lookup falls back to search;
//! 3. everything else runs the generic workspace search.
//!
//! Collaborator failures are logged and recovered here, never returned.

use crate::classifier::QueryClassifier;
use crate::clock::Clock;
use chrono::Datelike;
use huddle_config::RetrievalConfig;
use huddle_protocol::{EventHit, Intent, Member, RetrievalResult, WorkspaceInfo};
use huddle_tools::{CalendarLookup, ToolEndpoint, ToolReply, ToolRequest, WorkspaceSearch};
use log::{debug, warn};
use std::sync::Arc;

/// Outcome of the retrieval step.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// A tool integration answered the request directly.
    Specialized(ToolReply),
    /// Records to ground the generated answer.
    Content {
        hits: Vec<RetrievalResult>,
        meeting_like: bool,
    },
    /// Nothing relevant was found. Not an error.
    NoContent { meeting_like: bool },
}

/// Decides which retrieval calls to make and in what order.
#[derive(Clone)]
pub struct RetrievalOrchestrator {
    search: Arc<dyn WorkspaceSearch>,
    calendar: Arc<dyn CalendarLookup>,
    tools: Arc<dyn ToolEndpoint>,
    classifier: QueryClassifier,
    clock: Arc<dyn Clock>,
    limits: RetrievalConfig,
}

impl RetrievalOrchestrator {
    pub fn new(
        search: Arc<dyn WorkspaceSearch>,
        calendar: Arc<dyn CalendarLookup>,
        tools: Arc<dyn ToolEndpoint>,
        clock: Arc<dyn Clock>,
        limits: RetrievalConfig,
    ) -> Self {
        Self {
            search,
            calendar,
            tools,
            classifier: QueryClassifier::new(),
            clock,
            limits,
        }
    }

    pub async fn retrieve(
        &self,
        intent: Intent,
        query: &str,
        member: &Member,
        workspace: &WorkspaceInfo,
    ) -> Retrieval {
        let mut fallback = false;
        if intent.is_specialized() {
            let request = ToolRequest {
                intent,
                message: query.to_string(),
                workspace_context: workspace.render_context(member),
                workspace_id: workspace.id.clone(),
            };
            match self.tools.execute(&request).await {
                Ok(reply) => {
                    debug!("specialized tool answered (intent={})", intent);
                    return Retrieval::Specialized(reply);
                }
                Err(err) => {
                    warn!(
                        "specialized tool failed, falling back to search (intent={}, error={})",
                        intent, err
                    );
                    fallback = true;
                }
            }
        }

        let meeting_like = self.classifier.is_meeting_like(query);
        let mut hits = Vec::new();
        if meeting_like {
            hits = self.calendar_hits(&workspace.id, query).await;
            if hits.is_empty() {
                fallback = true;
            }
        }
        if hits.is_empty() {
            let limit = if fallback {
                self.limits.fallback_limit
            } else {
                self.limits.generic_limit
            };
            hits = self.search_hits(&workspace.id, query, limit).await;
        }

        debug!(
            "retrieval finished (intent={}, meeting_like={}, fallback={}, hits={})",
            intent,
            meeting_like,
            fallback,
            hits.len()
        );
        if hits.is_empty() {
            Retrieval::NoContent { meeting_like }
        } else {
            Retrieval::Content { hits, meeting_like }
        }
    }

    /// This month's events in start order, narrowed to today when the query
    /// asks for it and to today onward otherwise. Undated events sort last.
    async fn calendar_hits(&self, workspace_id: &str, query: &str) -> Vec<RetrievalResult> {
        let now = self.clock.now();
        let mut events = match self
            .calendar
            .events(workspace_id, now.month(), now.year())
            .await
        {
            Ok(events) => events,
            Err(err) => {
                warn!(
                    "calendar lookup failed, falling back to search (workspace_id={}, error={})",
                    workspace_id, err
                );
                return Vec::new();
            }
        };
        let today_only = self.classifier.mentions_today(query);
        let today = now.date_naive();
        let total = events.len();
        events.sort_by_key(|event| (event.starts_at.is_none(), event.starts_at));
        let hits: Vec<_> = events
            .into_iter()
            .filter(|event: &EventHit| match event.starts_at.map(|start| start.date_naive()) {
                Some(day) if today_only => day == today,
                Some(day) => day >= today,
                None => !today_only,
            })
            .take(self.limits.calendar_limit)
            .map(RetrievalResult::Event)
            .collect();
        debug!(
            "calendar lookup (workspace_id={}, events={}, kept={}, today_only={})",
            workspace_id,
            total,
            hits.len(),
            today_only
        );
        hits
    }

    async fn search_hits(&self, workspace_id: &str, query: &str, limit: usize) -> Vec<RetrievalResult> {
        match self.search.search(workspace_id, query, limit).await {
            Ok(mut hits) => {
                hits.truncate(limit);
                hits
            }
            Err(err) => {
                warn!(
                    "workspace search failed (workspace_id={}, error={})",
                    workspace_id, err
                );
                Vec::new()
            }
        }
    }
}
