use huddle::assistant_from_config;
use huddle::config::{HistoryConfig, HistoryProvider, HuddleConfig, WorkspaceRoster};
use huddle::core::HuddleCoreError;
use huddle::protocol::Role;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn roster() -> WorkspaceRoster {
    WorkspaceRoster {
        id: "ws-1".to_string(),
        name: "Launch Team".to_string(),
        members: vec!["alice".to_string()],
    }
}

#[tokio::test]
async fn unconfigured_endpoints_degrade_to_no_information() {
    let config = HuddleConfig::builder().workspace(roster()).build();
    let assistant = assistant_from_config(&config).expect("assistant");

    let reply = assistant
        .generate_response("ws-1", "alice", "what did we decide yesterday?")
        .await
        .expect("reply");

    assert_eq!(reply.response, config.assistant.no_information_message);
    assert_eq!(reply.error, None);
}

#[tokio::test]
async fn roster_gates_access() {
    let config = HuddleConfig::builder().workspace(roster()).build();
    let assistant = assistant_from_config(&config).expect("assistant");

    let err = assistant
        .generate_response("ws-1", "eve", "hello")
        .await
        .expect_err("eve is not listed");
    assert!(matches!(err, HuddleCoreError::NotAMember { .. }));

    let err = assistant
        .generate_response("ws-2", "alice", "hello")
        .await
        .expect_err("unknown workspace");
    assert!(matches!(err, HuddleCoreError::Unauthorized(_)));
}

#[tokio::test]
async fn file_history_survives_a_restart() {
    let dir = tempdir().expect("tempdir");
    let config = HuddleConfig::builder()
        .workspace(roster())
        .history(HistoryConfig {
            provider: HistoryProvider::File,
            path: Some(dir.path().display().to_string()),
            ..HistoryConfig::default()
        })
        .build();

    let first = assistant_from_config(&config).expect("assistant");
    first
        .generate_response("ws-1", "alice", "anything new?")
        .await
        .expect("reply");

    let second = assistant_from_config(&config).expect("assistant");
    let history = second.history("ws-1", "alice").await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "anything new?");
}
