//! Sources and navigation actions derived from retrieved records.
//!
//! Both are computed from the hits, never from the generated text.

use crate::extract::extract_snippet;
use huddle_protocol::{ActionKind, NavigationAction, RetrievalResult, Source};
use std::collections::BTreeSet;

/// Keywords that mark a snippet as calendar-related.
const CALENDAR_KEYWORDS: [&str; 3] = ["meeting", "calendar", "appointment"];
const ELLIPSIS: &str = "...";

/// Derives citations and suggested destinations for a reply.
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    source_text_chars: usize,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PostProcessor {
    pub fn new(source_text_chars: usize) -> Self {
        Self { source_text_chars }
    }

    /// One citation per hit, in retrieval order.
    pub fn sources(&self, hits: &[RetrievalResult]) -> Vec<Source> {
        hits.iter()
            .map(|hit| Source {
                id: hit.id().to_string(),
                kind: hit.source_kind(),
                text: truncate(&extract_snippet(hit), self.source_text_chars),
            })
            .collect()
    }

    pub fn actions(&self, hits: &[RetrievalResult], meeting_like: bool) -> Vec<NavigationAction> {
        derive_actions(hits, meeting_like)
    }
}

/// Infer destinations independently per kind; output is deduplicated and
/// ordered calendar, notes, boards, chats.
pub fn derive_actions(hits: &[RetrievalResult], meeting_like: bool) -> Vec<NavigationAction> {
    let mut kinds = BTreeSet::new();
    if meeting_like {
        kinds.insert(ActionKind::Calendar);
    }
    for hit in hits {
        if let Some(kind) = destination(hit) {
            kinds.insert(kind);
        }
        // Overlaps the classifier's meeting vocabulary; kept so keyword-only
        // matches in snippets still surface the calendar.
        if mentions_calendar(&extract_snippet(hit)) {
            kinds.insert(ActionKind::Calendar);
        }
    }
    kinds.into_iter().map(NavigationAction::for_kind).collect()
}

fn destination(hit: &RetrievalResult) -> Option<ActionKind> {
    match hit {
        RetrievalResult::Event(_) => Some(ActionKind::Calendar),
        RetrievalResult::Note(_) => Some(ActionKind::Notes),
        RetrievalResult::Card(_) => Some(ActionKind::Boards),
        RetrievalResult::Message(_) => Some(ActionKind::Chats),
        RetrievalResult::Task(_) | RetrievalResult::Other(_) => None,
    }
}

fn mentions_calendar(text: &str) -> bool {
    let lower = text.to_lowercase();
    CALENDAR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Keep at most `max_chars` characters, appending an ellipsis when cut.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
