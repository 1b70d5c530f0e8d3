use chrono::{DateTime, TimeZone, Utc};
use huddle_config::HuddleConfig;
use huddle_core::{Assistant, Collaborators, HuddleCoreError};
use huddle_history::{ChatHistoryStore, DocumentStore, InMemoryDocumentStore, RetryPolicy};
use huddle_protocol::{
    ActionKind, EventHit, MessageHit, NavigationAction, NoteHit, RetrievalResult, Role, SourceKind,
};
use huddle_test_utils::{
    FailingGenerator, FailingTool, FixedClock, FixedTool, FlakyDocumentStore, RecordingGenerator,
    StaticMembers, StubCalendar, StubSearch,
};
use huddle_tools::{ResponseGenerator, ToolEndpoint};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const WORKSPACE: &str = "ws-1";
const ALICE: &str = "alice";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
}

fn config() -> HuddleConfig {
    HuddleConfig::default()
}

struct Harness {
    search: Arc<StubSearch>,
    calendar: Arc<StubCalendar>,
    tools: Arc<dyn ToolEndpoint>,
    generator: Arc<dyn ResponseGenerator>,
    store: Arc<dyn DocumentStore>,
}

impl Harness {
    fn new(search: StubSearch) -> Self {
        Self {
            search: Arc::new(search),
            calendar: Arc::new(StubCalendar::new(Vec::new())),
            tools: Arc::new(FailingTool::with_status(500)),
            generator: Arc::new(RecordingGenerator::new("generated answer")),
            store: Arc::new(InMemoryDocumentStore::new()),
        }
    }

    fn calendar(mut self, calendar: StubCalendar) -> Self {
        self.calendar = Arc::new(calendar);
        self
    }

    fn tools(mut self, tools: Arc<dyn ToolEndpoint>) -> Self {
        self.tools = tools;
        self
    }

    fn generator(mut self, generator: Arc<dyn ResponseGenerator>) -> Self {
        self.generator = generator;
        self
    }

    fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = store;
        self
    }

    fn assistant(&self) -> Assistant {
        let config = config();
        let collaborators = Collaborators {
            members: Arc::new(StaticMembers::new(WORKSPACE, "Launch Team", &[ALICE, "bob"])),
            search: self.search.clone(),
            calendar: self.calendar.clone(),
            tools: self.tools.clone(),
            generator: self.generator.clone(),
        };
        let history = ChatHistoryStore::new(
            self.store.clone(),
            RetryPolicy::immediate(3),
            "Welcome back",
        );
        Assistant::with_clock(collaborators, history, &config, Arc::new(FixedClock(now())))
    }
}

fn message_hit(id: &str, text: &str) -> RetrievalResult {
    RetrievalResult::Message(MessageHit {
        id: id.to_string(),
        text: Some(text.to_string()),
        ..MessageHit::default()
    })
}

fn event_at(id: &str, title: &str, starts_at: DateTime<Utc>) -> EventHit {
    EventHit {
        id: id.to_string(),
        title: Some(title.to_string()),
        starts_at: Some(starts_at),
        ..EventHit::default()
    }
}

#[tokio::test]
async fn grounded_answer_carries_sources_actions_and_is_recorded() {
    let hits = vec![
        message_hit("m1", "release is planned for friday"),
        RetrievalResult::Note(NoteHit {
            id: "n1".to_string(),
            title: Some("Release checklist".to_string()),
            ..NoteHit::default()
        }),
    ];
    let generator = Arc::new(RecordingGenerator::new("Release is friday."));
    let harness = Harness::new(StubSearch::new(hits)).generator(generator.clone());
    let assistant = harness.assistant();

    let reply = assistant
        .generate_response(WORKSPACE, ALICE, "  when is the release?  ")
        .await
        .expect("reply");

    assert_eq!(reply.response, "Release is friday.");
    assert_eq!(reply.error, None);
    let source_ids: Vec<_> = reply.sources.iter().map(|source| source.id.as_str()).collect();
    assert_eq!(source_ids, vec!["m1", "n1"]);
    assert_eq!(reply.sources[1].kind, SourceKind::Note);
    let kinds: Vec<_> = reply.actions.iter().map(|action| action.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Notes, ActionKind::Chats]);
    assert_eq!(harness.search.limits(), vec![config().retrieval.generic_limit]);

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].workspace_id, WORKSPACE);
    assert!(requests[0].workspace_context.contains("[MESSAGE] release is planned for friday"));
    assert!(requests[0].message.contains("User: when is the release?"));

    let history = assistant.history(WORKSPACE, ALICE).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "when is the release?");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "Release is friday.");
    assert_eq!(history[1].sources, reply.sources);
}

#[tokio::test]
async fn failing_tool_falls_back_to_search_with_fallback_limit() {
    let tools = Arc::new(FailingTool::with_status(500));
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "PR #42 needs review")]))
        .tools(tools.clone());

    let reply = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "show my github PRs")
        .await
        .expect("reply");

    assert_eq!(tools.calls(), 1);
    assert_eq!(reply.error, None);
    assert_eq!(reply.response, "generated answer");
    assert_eq!(harness.search.limits(), vec![config().retrieval.fallback_limit]);
}

#[tokio::test]
async fn specialized_tool_reply_is_returned_and_recorded() {
    let tool = Arc::new(
        FixedTool::new("You have 2 open pull requests.")
            .with_actions(vec![NavigationAction::for_kind(ActionKind::Chats)]),
    );
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "unused")])).tools(tool.clone());
    let assistant = harness.assistant();

    let reply = assistant
        .generate_response(WORKSPACE, ALICE, "any open pull requests?")
        .await
        .expect("reply");

    assert_eq!(reply.response, "You have 2 open pull requests.");
    assert_eq!(reply.actions.len(), 1);
    assert!(reply.sources.is_empty());
    assert!(harness.search.limits().is_empty());

    let requests = tool.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].workspace_id, WORKSPACE);
    assert!(requests[0].workspace_context.contains("Launch Team"));

    let history = assistant.history(WORKSPACE, ALICE).await.expect("history");
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn no_results_returns_fixed_message_and_records_it() {
    let generator = Arc::new(RecordingGenerator::new("never used"));
    let harness = Harness::new(StubSearch::new(Vec::new())).generator(generator.clone());
    let assistant = harness.assistant();

    let reply = assistant
        .generate_response(WORKSPACE, ALICE, "what is our refund policy?")
        .await
        .expect("reply");

    assert_eq!(reply.response, config().assistant.no_information_message);
    assert!(reply.sources.is_empty());
    assert!(reply.actions.is_empty());
    assert_eq!(reply.error, None);
    assert!(generator.requests().is_empty());

    let history = assistant.history(WORKSPACE, ALICE).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, reply.response);
}

#[tokio::test]
async fn search_failure_is_treated_as_no_content() {
    let harness = Harness::new(StubSearch::failing());

    let reply = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "what did bob say?")
        .await
        .expect("reply");

    assert_eq!(reply.response, config().assistant.no_information_message);
    assert_eq!(reply.error, None);
}

#[tokio::test]
async fn generator_failure_returns_apology_without_recording() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "hello")]))
        .generator(Arc::new(FailingGenerator::new("model overloaded")));
    let assistant = harness.assistant();

    let reply = assistant
        .generate_response(WORKSPACE, ALICE, "summarize the chat")
        .await
        .expect("reply");

    assert_eq!(reply.response, config().assistant.apology_message);
    let error = reply.error.expect("error is reported in-band");
    assert!(error.contains("model overloaded"));
    assert!(reply.sources.is_empty());

    let history = assistant.history(WORKSPACE, ALICE).await.expect("history");
    assert!(history.is_empty());
}

#[tokio::test]
async fn exhausted_history_writes_surface_the_unrecorded_reply() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "hello")]))
        .store(Arc::new(FlakyDocumentStore::new(3)));

    let err = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "summarize the chat")
        .await
        .expect_err("history write should fail");

    let HuddleCoreError::HistoryNotPersisted { reply, .. } = err else {
        panic!("expected HistoryNotPersisted, got {err:?}");
    };
    assert_eq!(reply.response, "generated answer");
}

#[tokio::test]
async fn unknown_session_is_unauthorized() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "hello")]));

    let err = harness
        .assistant()
        .generate_response(WORKSPACE, "", "hello?")
        .await
        .expect_err("no session");

    assert!(matches!(err, HuddleCoreError::Unauthorized(_)));
    assert!(harness.search.limits().is_empty());
}

#[tokio::test]
async fn non_member_is_rejected_before_retrieval() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "hello")]));

    let err = harness
        .assistant()
        .generate_response(WORKSPACE, "mallory", "hello?")
        .await
        .expect_err("not a member");

    let HuddleCoreError::NotAMember { participant_id, .. } = err else {
        panic!("expected NotAMember, got {err:?}");
    };
    assert_eq!(participant_id, "mallory");
    assert!(harness.search.limits().is_empty());
}

#[tokio::test]
async fn blank_message_is_invalid() {
    let harness = Harness::new(StubSearch::new(Vec::new()));

    let err = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "   ")
        .await
        .expect_err("blank message");

    assert!(matches!(err, HuddleCoreError::InvalidRequest(_)));
}

#[tokio::test]
async fn meetings_today_only_uses_todays_events() {
    let today = Utc.with_ymd_and_hms(2026, 3, 14, 15, 0, 0).unwrap();
    let tomorrow = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
    let calendar = StubCalendar::new(vec![
        event_at("e1", "Design review", today),
        event_at("e2", "Retro", tomorrow),
    ]);
    let generator = Arc::new(RecordingGenerator::new("You have a design review at 3 PM."));
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "unused")]))
        .calendar(calendar)
        .generator(generator.clone());

    let reply = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "what meetings do I have today?")
        .await
        .expect("reply");

    assert_eq!(harness.calendar.scopes(), vec![(3, 2026)]);
    assert!(harness.search.limits().is_empty());
    let source_ids: Vec<_> = reply.sources.iter().map(|source| source.id.as_str()).collect();
    assert_eq!(source_ids, vec!["e1"]);
    assert_eq!(reply.actions[0].kind, ActionKind::Calendar);

    let requests = generator.requests();
    assert!(requests[0].workspace_context.contains("Design review"));
    assert!(!requests[0].workspace_context.contains("Retro"));
    assert!(requests[0].message.contains("### 📅 Today"));
}

#[tokio::test]
async fn failed_calendar_falls_back_to_search() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "standup moved to 10")]))
        .calendar(StubCalendar::failing());

    let reply = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "when is the next meeting?")
        .await
        .expect("reply");

    assert_eq!(reply.response, "generated answer");
    assert_eq!(harness.search.limits(), vec![config().retrieval.fallback_limit]);
    let kinds: Vec<_> = reply.actions.iter().map(|action| action.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Calendar, ActionKind::Chats]);
}

#[tokio::test]
async fn upcoming_meeting_survives_a_busy_month() {
    let mut events: Vec<_> = (1..=6)
        .map(|day| {
            let starts_at = Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap();
            event_at(&format!("past{day}"), "Standup", starts_at)
        })
        .collect();
    events.push(EventHit {
        id: "undated".to_string(),
        title: Some("Offsite planning".to_string()),
        ..EventHit::default()
    });
    events.push(event_at(
        "board",
        "Board meeting",
        Utc.with_ymd_and_hms(2026, 3, 27, 14, 0, 0).unwrap(),
    ));
    events.push(event_at(
        "later-today",
        "Design review",
        Utc.with_ymd_and_hms(2026, 3, 14, 16, 0, 0).unwrap(),
    ));
    let generator = Arc::new(RecordingGenerator::new("Your next meeting is a design review."));
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "unused")]))
        .calendar(StubCalendar::new(events))
        .generator(generator.clone());

    let reply = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "when is my next meeting?")
        .await
        .expect("reply");

    let source_ids: Vec<_> = reply.sources.iter().map(|source| source.id.as_str()).collect();
    assert_eq!(source_ids, vec!["later-today", "board", "undated"]);
    assert!(harness.search.limits().is_empty());
    assert!(generator.requests()[0].workspace_context.contains("Board meeting"));
}

#[tokio::test]
async fn empty_calendar_falls_back_to_search() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "standup moved to 10")]));

    let reply = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "when is the next meeting?")
        .await
        .expect("reply");

    assert_eq!(harness.calendar.scopes(), vec![(3, 2026)]);
    assert_eq!(harness.search.limits(), vec![config().retrieval.fallback_limit]);
    let source_ids: Vec<_> = reply.sources.iter().map(|source| source.id.as_str()).collect();
    assert_eq!(source_ids, vec!["m1"]);
}

#[tokio::test]
async fn no_meetings_today_falls_back_to_search() {
    let tomorrow = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "retro is tomorrow")]))
        .calendar(StubCalendar::new(vec![event_at("e2", "Retro", tomorrow)]));

    let reply = harness
        .assistant()
        .generate_response(WORKSPACE, ALICE, "what meetings do I have today?")
        .await
        .expect("reply");

    assert_eq!(harness.calendar.scopes(), vec![(3, 2026)]);
    assert_eq!(harness.search.limits(), vec![config().retrieval.fallback_limit]);
    let source_ids: Vec<_> = reply.sources.iter().map(|source| source.id.as_str()).collect();
    assert_eq!(source_ids, vec!["m1"]);
}

#[tokio::test]
async fn reset_replaces_history_with_greeting() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "hello")]));
    let assistant = harness.assistant();

    assert!(!assistant.reset_history(WORKSPACE, ALICE).await.expect("reset"));
    assert!(assistant.history(WORKSPACE, ALICE).await.expect("history").is_empty());

    assistant
        .generate_response(WORKSPACE, ALICE, "summarize the chat")
        .await
        .expect("reply");
    assert!(assistant.reset_history(WORKSPACE, ALICE).await.expect("reset"));

    let history = assistant.history(WORKSPACE, ALICE).await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, Role::Assistant);
    assert_eq!(history[0].content, "Welcome back");
    assert_eq!(history[0].timestamp, now());
}

#[tokio::test]
async fn histories_are_scoped_per_member() {
    let harness = Harness::new(StubSearch::new(vec![message_hit("m1", "hello")]));
    let assistant = harness.assistant();

    assistant
        .generate_response(WORKSPACE, ALICE, "summarize the chat")
        .await
        .expect("reply");

    assert_eq!(assistant.history(WORKSPACE, ALICE).await.expect("alice").len(), 2);
    assert!(assistant.history(WORKSPACE, "bob").await.expect("bob").is_empty());
}
