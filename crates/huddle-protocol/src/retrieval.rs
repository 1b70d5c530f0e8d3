//! Heterogeneous retrieval hits returned by workspace search and calendar lookup.
//!
//! Each variant keeps the shape of its originating entity. There is no common
//! text field: consumers extract display text per variant.

use crate::SourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One retrieval hit, tagged by originating entity kind on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHit", into = "RawHit")]
pub enum RetrievalResult {
    /// Chat message hit.
    Message(MessageHit),
    /// Task hit.
    Task(TaskHit),
    /// Note hit.
    Note(NoteHit),
    /// Board card hit.
    Card(CardHit),
    /// Calendar-like event hit.
    Event(EventHit),
    /// Any other record kind.
    Other(OtherHit),
}

impl RetrievalResult {
    /// Identifier of the originating record.
    pub fn id(&self) -> &str {
        match self {
            RetrievalResult::Message(hit) => &hit.id,
            RetrievalResult::Task(hit) => &hit.id,
            RetrievalResult::Note(hit) => &hit.id,
            RetrievalResult::Card(hit) => &hit.id,
            RetrievalResult::Event(hit) => &hit.id,
            RetrievalResult::Other(hit) => &hit.id,
        }
    }

    /// Source kind used for citations.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            RetrievalResult::Message(_) => SourceKind::Message,
            RetrievalResult::Task(_) => SourceKind::Task,
            RetrievalResult::Note(_) => SourceKind::Note,
            RetrievalResult::Card(_) => SourceKind::Card,
            RetrievalResult::Event(_) => SourceKind::Event,
            RetrievalResult::Other(_) => SourceKind::Document,
        }
    }

    /// Wire type tag of the hit.
    pub fn type_tag(&self) -> &str {
        match self {
            RetrievalResult::Other(hit) if !hit.kind.trim().is_empty() => hit.kind.as_str(),
            other => other.source_kind().as_str(),
        }
    }
}

/// Chat message hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageHit {
    pub id: String,
    pub text: Option<String>,
    pub channel: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Task hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskHit {
    pub id: String,
    pub text: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Note hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteHit {
    pub id: String,
    pub text: Option<String>,
    pub title: Option<String>,
}

/// Board card hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardHit {
    pub id: String,
    pub text: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub board: Option<String>,
}

/// Calendar-like event hit. Events created from chat carry the source message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventHit {
    pub id: String,
    pub text: Option<String>,
    pub title: Option<String>,
    pub message: Option<EventMessage>,
    pub starts_at: Option<DateTime<Utc>>,
}

/// Message attached to an event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(default)]
    pub body: Option<String>,
}

/// Hit of a kind this crate does not model explicitly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OtherHit {
    pub id: String,
    pub kind: String,
    pub text: Option<String>,
    pub title: Option<String>,
}

/// Flat wire shape shared by every hit kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHit {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    board: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<EventMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl From<RawHit> for RetrievalResult {
    fn from(raw: RawHit) -> Self {
        match raw.kind.as_str() {
            "message" => RetrievalResult::Message(MessageHit {
                id: raw.id,
                text: raw.text,
                channel: raw.channel,
                author: raw.author,
                created_at: raw.created_at,
            }),
            "task" => RetrievalResult::Task(TaskHit {
                id: raw.id,
                text: raw.text,
                title: raw.title,
                description: raw.description,
                status: raw.status,
            }),
            "note" => RetrievalResult::Note(NoteHit {
                id: raw.id,
                text: raw.text,
                title: raw.title,
            }),
            "card" | "board_card" | "boardCard" => RetrievalResult::Card(CardHit {
                id: raw.id,
                text: raw.text,
                title: raw.title,
                description: raw.description,
                board: raw.board,
            }),
            "event" | "calendar" | "calendar_event" => RetrievalResult::Event(EventHit {
                id: raw.id,
                text: raw.text,
                title: raw.title,
                message: raw.message,
                starts_at: raw.starts_at,
            }),
            _ => RetrievalResult::Other(OtherHit {
                id: raw.id,
                kind: raw.kind,
                text: raw.text,
                title: raw.title,
            }),
        }
    }
}

impl From<RetrievalResult> for RawHit {
    fn from(result: RetrievalResult) -> Self {
        match result {
            RetrievalResult::Message(hit) => RawHit {
                kind: "message".to_string(),
                id: hit.id,
                text: hit.text,
                channel: hit.channel,
                author: hit.author,
                created_at: hit.created_at,
                ..RawHit::default()
            },
            RetrievalResult::Task(hit) => RawHit {
                kind: "task".to_string(),
                id: hit.id,
                text: hit.text,
                title: hit.title,
                description: hit.description,
                status: hit.status,
                ..RawHit::default()
            },
            RetrievalResult::Note(hit) => RawHit {
                kind: "note".to_string(),
                id: hit.id,
                text: hit.text,
                title: hit.title,
                ..RawHit::default()
            },
            RetrievalResult::Card(hit) => RawHit {
                kind: "card".to_string(),
                id: hit.id,
                text: hit.text,
                title: hit.title,
                description: hit.description,
                board: hit.board,
                ..RawHit::default()
            },
            RetrievalResult::Event(hit) => RawHit {
                kind: "event".to_string(),
                id: hit.id,
                text: hit.text,
                title: hit.title,
                message: hit.message,
                starts_at: hit.starts_at,
                ..RawHit::default()
            },
            RetrievalResult::Other(hit) => RawHit {
                kind: hit.kind,
                id: hit.id,
                text: hit.text,
                title: hit.title,
                ..RawHit::default()
            },
        }
    }
}
