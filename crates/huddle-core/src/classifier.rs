//! Rule-based query classification and query signals.

use huddle_protocol::Intent;
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

/// Ordered intent rules; the first match wins.
const INTENT_RULES: &[(Intent, &str)] = &[
    (
        Intent::ToolGithub,
        r"(?i)\b(github|pull requests?|prs?|repos?|repositor(?:y|ies))\b",
    ),
    (Intent::ToolGmail, r"(?i)\b(gmail|e-?mails?|inbox)\b"),
    (
        Intent::Calendar,
        r"(?i)\b(calendar|meetings?|events?|schedule[ds]?|appointments?|agenda|stand-?ups?)\b",
    ),
    (Intent::Notes, r"(?i)\b(notes?|docs?|documents?|wiki)\b"),
    (
        Intent::Tasks,
        r"(?i)\b(tasks?|to-?dos?|assigned|deadlines?|due)\b",
    ),
    (Intent::Board, r"(?i)\b(boards?|cards?|kanban|columns?|backlog)\b"),
];

/// Vocabulary that makes a query meeting-like for retrieval and formatting.
const MEETING_PATTERN: &str =
    r"(?i)\b(meetings?|events?|calendar|schedule[ds]?|appointments?|calls?|stand-?ups?|syncs?|agenda)\b";

/// Narrows a meeting-like query to the current day.
const TODAY_PATTERN: &str = r"(?i)\b(today|tonight|this (?:morning|afternoon|evening))\b";

static DEFAULT_CLASSIFIER: LazyLock<QueryClassifier> = LazyLock::new(QueryClassifier::new);

/// Classify `text` with the built-in rule set. Never fails; `chatbot` is the
/// default when no rule matches.
pub fn classify(text: &str) -> Intent {
    DEFAULT_CLASSIFIER.classify(text)
}

/// Compiled intent rules plus the meeting and today detectors.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    rules: Vec<(Intent, Regex)>,
    meeting: Option<Regex>,
    today: Option<Regex>,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClassifier {
    pub fn new() -> Self {
        let rules = INTENT_RULES
            .iter()
            .filter_map(|(intent, pattern)| compile(pattern).map(|regex| (*intent, regex)))
            .collect();
        Self {
            rules,
            meeting: compile(MEETING_PATTERN),
            today: compile(TODAY_PATTERN),
        }
    }

    pub fn classify(&self, text: &str) -> Intent {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Chatbot)
    }

    /// Whether the query talks about meetings or other calendar-like events.
    pub fn is_meeting_like(&self, text: &str) -> bool {
        self.meeting.as_ref().is_some_and(|regex| regex.is_match(text))
    }

    /// Whether the query is about the current day.
    pub fn mentions_today(&self, text: &str) -> bool {
        self.today.as_ref().is_some_and(|regex| regex.is_match(text))
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!("skipping invalid classifier pattern (error={})", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_input_maps_to_a_known_intent() {
        let long = "a".repeat(10_000);
        let inputs: [&str; 7] = [
            "",
            "   ",
            "🙂🙂🙂",
            "what's up",
            "\u{0}\u{7f}",
            "SELECT * FROM users; --",
            long.as_str(),
        ];
        for input in inputs {
            let intent = classify(input);
            assert!(Intent::ALL.contains(&intent), "unexpected intent for {input:?}");
        }
    }

    #[test]
    fn unmatched_queries_default_to_chatbot() {
        assert_eq!(classify("what did we decide about the logo?"), Intent::Chatbot);
        assert_eq!(classify(""), Intent::Chatbot);
    }

    #[test]
    fn earlier_rules_take_priority() {
        assert_eq!(classify("meeting about a github issue"), Intent::ToolGithub);
        assert_eq!(classify("email me the meeting notes"), Intent::ToolGmail);
        assert_eq!(classify("notes from the standup"), Intent::Calendar);
        assert_eq!(classify("tasks on the board"), Intent::Tasks);
    }

    #[test]
    fn single_rule_matches() {
        assert_eq!(classify("Open a Pull Request for the fix"), Intent::ToolGithub);
        assert_eq!(classify("check my inbox"), Intent::ToolGmail);
        assert_eq!(classify("what's on the calendar?"), Intent::Calendar);
        assert_eq!(classify("find the onboarding doc"), Intent::Notes);
        assert_eq!(classify("what is due friday"), Intent::Tasks);
        assert_eq!(classify("show the kanban"), Intent::Board);
    }

    #[test]
    fn rules_match_whole_words_only() {
        assert_eq!(classify("the reporting dashboard"), Intent::Chatbot);
        assert_eq!(classify("cardinal rules"), Intent::Chatbot);
    }

    #[test]
    fn detects_meeting_and_today_signals() {
        let classifier = QueryClassifier::new();
        assert!(classifier.is_meeting_like("Any meetings today?"));
        assert!(classifier.is_meeting_like("when is the stand-up"));
        assert!(!classifier.is_meeting_like("summarize the roadmap"));
        assert!(classifier.mentions_today("what's on this afternoon"));
        assert!(!classifier.mentions_today("what's on tomorrow"));
    }
}
