//! Request lifecycle for one assistant question.

use crate::classifier::classify;
use crate::clock::{Clock, SystemClock};
use crate::context::assemble_context;
use crate::error::HuddleCoreError;
use crate::postprocess::PostProcessor;
use crate::prompt::{PromptBuilder, PromptInput};
use crate::retrieval::{Retrieval, RetrievalOrchestrator};
use huddle_config::{AssistantConfig, HuddleConfig};
use huddle_history::{ChatHistoryStore, HistoryKey};
use huddle_protocol::{AssistantReply, ChatMessage, Member, WorkspaceInfo};
use huddle_tools::{
    CalendarLookup, GenerationRequest, MemberResolver, ResponseGenerator, ToolEndpoint,
    WorkspaceSearch,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Typed handles to every external collaborator.
#[derive(Clone)]
pub struct Collaborators {
    pub members: Arc<dyn MemberResolver>,
    pub search: Arc<dyn WorkspaceSearch>,
    pub calendar: Arc<dyn CalendarLookup>,
    pub tools: Arc<dyn ToolEndpoint>,
    pub generator: Arc<dyn ResponseGenerator>,
}

/// The workspace assistant.
///
/// Holds no per-request state; concurrent requests only meet in the history
/// store.
#[derive(Clone)]
pub struct Assistant {
    members: Arc<dyn MemberResolver>,
    generator: Arc<dyn ResponseGenerator>,
    history: ChatHistoryStore,
    retrieval: RetrievalOrchestrator,
    prompt: PromptBuilder,
    post: PostProcessor,
    wording: AssistantConfig,
    clock: Arc<dyn Clock>,
}

impl Assistant {
    pub fn new(collaborators: Collaborators, history: ChatHistoryStore, config: &HuddleConfig) -> Self {
        Self::with_clock(collaborators, history, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        collaborators: Collaborators,
        history: ChatHistoryStore,
        config: &HuddleConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let retrieval = RetrievalOrchestrator::new(
            collaborators.search,
            collaborators.calendar,
            collaborators.tools,
            clock.clone(),
            config.retrieval.clone(),
        );
        info!(
            "assistant initialized (history_window={}, generic_limit={})",
            config.assistant.history_window, config.retrieval.generic_limit
        );
        Self {
            members: collaborators.members,
            generator: collaborators.generator,
            history,
            retrieval,
            prompt: PromptBuilder::new(
                config.assistant.persona.clone(),
                config.assistant.history_window,
            ),
            post: PostProcessor::new(config.assistant.source_text_chars),
            wording: config.assistant.clone(),
            clock,
        }
    }

    /// Answer `message` for `user_id` inside `workspace_id`.
    ///
    /// Authorization failures and unrecorded replies are the only errors;
    /// everything else is reported in-band on the returned reply.
    pub async fn generate_response(
        &self,
        workspace_id: &str,
        user_id: &str,
        message: &str,
    ) -> Result<AssistantReply, HuddleCoreError> {
        let member = self.members.resolve_member(workspace_id, user_id).await?;
        let question = message.trim();
        if question.is_empty() {
            return Err(HuddleCoreError::InvalidRequest(
                "message cannot be empty".to_string(),
            ));
        }
        let asked_at = self.clock.now();
        let key = HistoryKey::new(&member.workspace_id, &member.participant_id);
        let intent = classify(question);
        debug!(
            "classified query (intent={}, query_len={})",
            intent,
            question.len()
        );

        let (workspace, history) = tokio::join!(
            self.workspace_info(&member),
            self.history.recent(&key, self.prompt.history_window())
        );
        let history = history.unwrap_or_else(|err| {
            warn!("history unavailable for prompt (key={}, error={})", key, err);
            Vec::new()
        });

        let reply = match self
            .retrieval
            .retrieve(intent, question, &member, &workspace)
            .await
        {
            Retrieval::Specialized(tool) => AssistantReply {
                response: tool.response,
                actions: tool.actions,
                ..AssistantReply::default()
            },
            Retrieval::NoContent { .. } => AssistantReply::text(&self.wording.no_information_message),
            Retrieval::Content { hits, meeting_like } => {
                let context = assemble_context(&hits, meeting_like);
                let prompt = self.prompt.build(PromptInput {
                    workspace: &workspace,
                    context: &context,
                    history: &history,
                    question,
                    meeting_like,
                });
                debug!(
                    "built prompt (prompt_len={}, context_len={}, history={})",
                    prompt.len(),
                    context.len(),
                    history.len()
                );
                let request = GenerationRequest::chat(prompt, context, &workspace.id);
                match self.generator.generate(&request).await {
                    Ok(response) => AssistantReply {
                        response,
                        sources: self.post.sources(&hits),
                        actions: self.post.actions(&hits, meeting_like),
                        error: None,
                    },
                    Err(err) => {
                        warn!(
                            "generation failed (workspace_id={}, error={})",
                            workspace.id, err
                        );
                        return Ok(AssistantReply::degraded(
                            &self.wording.apology_message,
                            err.to_string(),
                        ));
                    }
                }
            }
        };

        self.record_exchange(&key, question, asked_at, reply).await
    }

    /// Full history of the asking member.
    pub async fn history(&self, workspace_id: &str, user_id: &str) -> Result<Vec<ChatMessage>, HuddleCoreError> {
        let member = self.members.resolve_member(workspace_id, user_id).await?;
        let key = HistoryKey::new(&member.workspace_id, &member.participant_id);
        Ok(self.history.read(&key).await?)
    }

    /// Reset the asking member's history to the greeting.
    ///
    /// Returns whether a history existed.
    pub async fn reset_history(&self, workspace_id: &str, user_id: &str) -> Result<bool, HuddleCoreError> {
        let member = self.members.resolve_member(workspace_id, user_id).await?;
        let key = HistoryKey::new(&member.workspace_id, &member.participant_id);
        Ok(self.history.reset(&key, self.clock.now()).await?)
    }

    async fn workspace_info(&self, member: &Member) -> WorkspaceInfo {
        match self.members.workspace_info(&member.workspace_id).await {
            Ok(info) => info,
            Err(err) => {
                warn!(
                    "workspace info unavailable (workspace_id={}, error={})",
                    member.workspace_id, err
                );
                WorkspaceInfo {
                    id: member.workspace_id.clone(),
                    name: member.workspace_id.clone(),
                }
            }
        }
    }

    /// Append the question and the reply, in that order.
    async fn record_exchange(
        &self,
        key: &HistoryKey,
        question: &str,
        asked_at: chrono::DateTime<chrono::Utc>,
        reply: AssistantReply,
    ) -> Result<AssistantReply, HuddleCoreError> {
        let appended = match self
            .history
            .append(key, ChatMessage::user(question, asked_at))
            .await
        {
            Ok(_) => {
                self.history
                    .append(key, reply.to_message(self.clock.now()))
                    .await
            }
            Err(err) => Err(err),
        };
        match appended {
            Ok(messages) => {
                info!(
                    "assistant reply recorded (key={}, messages={}, sources={}, actions={})",
                    key,
                    messages,
                    reply.sources.len(),
                    reply.actions.len()
                );
                Ok(reply)
            }
            Err(source) => {
                warn!("assistant reply not recorded (key={}, error={})", key, source);
                Err(HuddleCoreError::HistoryNotPersisted {
                    reply: Box::new(reply),
                    source,
                })
            }
        }
    }
}
