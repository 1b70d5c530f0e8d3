//! Uniform context block from heterogeneous hits.

use crate::extract::extract_snippet;
use huddle_protocol::RetrievalResult;

/// Marker steering the generator toward meeting-relevant records.
const MEETING_EMPHASIS: &str = "**Relevant to your meetings:**";

/// Render hits as `[TYPE] snippet` entries separated by blank lines, in
/// retrieval order.
pub fn assemble_context(hits: &[RetrievalResult], meeting_like: bool) -> String {
    hits.iter()
        .map(|hit| render_entry(hit, meeting_like))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_entry(hit: &RetrievalResult, meeting_like: bool) -> String {
    let label = hit.type_tag().to_uppercase();
    let snippet = extract_snippet(hit);
    if meeting_like && emphasized(hit) {
        format!("[{label}] {MEETING_EMPHASIS} {snippet}")
    } else {
        format!("[{label}] {snippet}")
    }
}

fn emphasized(hit: &RetrievalResult) -> bool {
    match hit {
        RetrievalResult::Task(_) | RetrievalResult::Message(_) | RetrievalResult::Card(_) => true,
        RetrievalResult::Note(_) | RetrievalResult::Event(_) | RetrievalResult::Other(_) => false,
    }
}
