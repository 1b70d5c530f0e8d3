//! Type-directed display text for retrieval hits.
//!
//! Shared by the context assembler and the post-processor so both derive the
//! same text from a hit.

use huddle_protocol::RetrievalResult;

/// Fallback for records with nothing displayable.
pub const NO_DESCRIPTION: &str = "No description available";
/// Fallback for calendar records without a body or title.
pub const CALENDAR_EVENT: &str = "Calendar event";

/// Extract a human-readable snippet from a hit. Never fails.
///
/// Rules, first applicable wins:
/// 1. a non-empty direct `text` field;
/// 2. events: message body, then title, then [`CALENDAR_EVENT`];
/// 3. board cards: title, with `": description"` when present;
/// 4. tasks: same as board cards;
/// 5. any other titled record: its title;
/// 6. [`NO_DESCRIPTION`].
pub fn extract_snippet(hit: &RetrievalResult) -> String {
    if let Some(text) = non_empty(direct_text(hit)) {
        return text.to_string();
    }
    let extracted = match hit {
        RetrievalResult::Event(event) => Some(
            non_empty(event.message.as_ref().and_then(|message| message.body.as_deref()))
                .or_else(|| non_empty(event.title.as_deref()))
                .unwrap_or(CALENDAR_EVENT)
                .to_string(),
        ),
        RetrievalResult::Card(card) => titled(card.title.as_deref(), card.description.as_deref()),
        RetrievalResult::Task(task) => titled(task.title.as_deref(), task.description.as_deref()),
        RetrievalResult::Note(note) => non_empty(note.title.as_deref()).map(str::to_string),
        RetrievalResult::Other(other) => non_empty(other.title.as_deref()).map(str::to_string),
        RetrievalResult::Message(_) => None,
    };
    extracted.unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

fn direct_text(hit: &RetrievalResult) -> Option<&str> {
    match hit {
        RetrievalResult::Message(hit) => hit.text.as_deref(),
        RetrievalResult::Task(hit) => hit.text.as_deref(),
        RetrievalResult::Note(hit) => hit.text.as_deref(),
        RetrievalResult::Card(hit) => hit.text.as_deref(),
        RetrievalResult::Event(hit) => hit.text.as_deref(),
        RetrievalResult::Other(hit) => hit.text.as_deref(),
    }
}

fn titled(title: Option<&str>, description: Option<&str>) -> Option<String> {
    let title = non_empty(title)?;
    Some(match non_empty(description) {
        Some(description) => format!("{title}: {description}"),
        None => title.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
