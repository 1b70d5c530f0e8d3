//! Conversation history operations built on the optimistic-append loop.

use crate::document::{HistoryDocument, HistoryKey};
use crate::error::HistoryError;
use crate::retry::{OptimisticAppend, RetryPolicy};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use huddle_protocol::ChatMessage;
use log::{debug, info};
use std::sync::Arc;

/// Append, reset and read access to per-participant chat histories.
///
/// This is the only writer of history documents. Message order within a
/// document is the order in which appends complete their write; concurrent
/// appends for the same key are not otherwise ordered.
#[derive(Clone)]
pub struct ChatHistoryStore {
    store: Arc<dyn DocumentStore>,
    writer: OptimisticAppend,
    greeting: String,
}

impl ChatHistoryStore {
    pub fn new(store: Arc<dyn DocumentStore>, policy: RetryPolicy, greeting: impl Into<String>) -> Self {
        Self {
            store,
            writer: OptimisticAppend::new(policy),
            greeting: greeting.into(),
        }
    }

    /// Append one message, creating the document on first use.
    ///
    /// Returns the number of messages in the history after the write.
    pub async fn append(&self, key: &HistoryKey, message: ChatMessage) -> Result<usize, HistoryError> {
        let store = self.store.as_ref();
        let updated_at = message.timestamp;
        let written = self
            .writer
            .run(
                "append",
                || store.load(key),
                |current: Option<&HistoryDocument>| {
                    Some(match current {
                        Some(existing) => {
                            let mut next = existing.clone();
                            next.messages.push(message.clone());
                            next.updated_at = updated_at;
                            next
                        }
                        None => HistoryDocument::first(key, message.clone(), updated_at),
                    })
                },
                |document, expected| store.save(key, document, expected),
            )
            .await?;
        let count = written.map_or(0, |stored| stored.value.messages.len());
        debug!(
            "appended history message (key={}, role={}, messages={})",
            key,
            message.role.as_str(),
            count
        );
        Ok(count)
    }

    /// Replace an existing history with the greeting message.
    ///
    /// An absent history is left absent; returns whether a document was reset.
    pub async fn reset(&self, key: &HistoryKey, now: DateTime<Utc>) -> Result<bool, HistoryError> {
        let store = self.store.as_ref();
        let greeting = ChatMessage::assistant(self.greeting.clone(), now);
        let written = self
            .writer
            .run(
                "reset",
                || store.load(key),
                |current: Option<&HistoryDocument>| {
                    current.map(|existing| HistoryDocument {
                        messages: vec![greeting.clone()],
                        updated_at: now,
                        ..existing.clone()
                    })
                },
                |document, expected| store.save(key, document, expected),
            )
            .await?;
        let reset = written.is_some();
        info!("history reset (key={}, existed={})", key, reset);
        Ok(reset)
    }

    /// All messages in insertion order; empty when no history exists.
    pub async fn read(&self, key: &HistoryKey) -> Result<Vec<ChatMessage>, HistoryError> {
        Ok(self
            .store
            .load(key)
            .await?
            .map(|stored| stored.value.messages)
            .unwrap_or_default())
    }

    /// The last `limit` messages, oldest first.
    pub async fn recent(&self, key: &HistoryKey, limit: usize) -> Result<Vec<ChatMessage>, HistoryError> {
        let mut messages = self.read(key).await?;
        let start = messages.len().saturating_sub(limit);
        Ok(messages.split_off(start))
    }
}
