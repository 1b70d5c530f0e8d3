use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use huddle_config::EndpointsConfig;
use huddle_protocol::{Intent, RetrievalResult, ToolError};
use huddle_tools::{
    CalendarLookup, GenerationRequest, HttpCollaborators, ResponseGenerator, ToolEndpoint,
    ToolRequest, WorkspaceSearch,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral port and return its base url.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn collaborators(base: &str) -> HttpCollaborators {
    HttpCollaborators::from_config(&EndpointsConfig {
        search_url: Some(format!("{base}/search")),
        calendar_url: Some(format!("{base}/calendar")),
        tool_url: Some(format!("{base}/tool")),
        generator_url: Some(format!("{base}/generate")),
        timeout_secs: 5,
    })
    .expect("collaborators")
}

fn tool_request() -> ToolRequest {
    ToolRequest {
        intent: Intent::ToolGithub,
        message: "open an issue for the login bug".to_string(),
        workspace_context: "Workspace: Design (ws-1)".to_string(),
        workspace_id: "ws-1".to_string(),
    }
}

#[tokio::test]
async fn search_decodes_tagged_hits_and_caps_results() {
    let router = Router::new().route(
        "/search",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["workspaceId"], "ws-1");
            Json(json!([
                { "type": "task", "id": "t1", "title": "Fix login" },
                { "type": "note", "id": "n1", "text": "Login notes" },
                { "type": "message", "id": "m1", "text": "login is broken" }
            ]))
        }),
    );
    let base = serve(router).await;

    let hits = collaborators(&base)
        .search
        .search("ws-1", "login", 2)
        .await
        .expect("search");

    assert_eq!(hits.len(), 2);
    assert!(matches!(hits[0], RetrievalResult::Task(_)));
    assert!(matches!(hits[1], RetrievalResult::Note(_)));
}

#[tokio::test]
async fn calendar_sends_month_scope() {
    let router = Router::new().route(
        "/calendar",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("month").map(String::as_str), Some("10"));
            assert_eq!(params.get("year").map(String::as_str), Some("2026"));
            Json(json!([{ "id": "e1", "title": "Sprint review" }]))
        }),
    );
    let base = serve(router).await;

    let events = collaborators(&base)
        .calendar
        .events("ws-1", 10, 2026)
        .await
        .expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "e1");
}

#[tokio::test]
async fn tool_non_success_status_is_an_error() {
    let router = Router::new().route(
        "/tool",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = serve(router).await;

    let err = collaborators(&base)
        .tool
        .execute(&tool_request())
        .await
        .unwrap_err();
    let ToolError::Status { status, body } = err else {
        panic!("expected status error, got {err}");
    };
    assert_eq!(status, 502);
    assert_eq!(body, "upstream down");
}

#[tokio::test]
async fn tool_html_body_is_malformed() {
    let router = Router::new().route("/tool", post(|| async { "<html>oops</html>" }));
    let base = serve(router).await;

    let err = collaborators(&base)
        .tool
        .execute(&tool_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Decode(_)));
}

#[tokio::test]
async fn generator_returns_response_text() {
    let router = Router::new().route(
        "/generate",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["type"], "chat");
            Json(json!({ "success": true, "response": "Here is the summary.", "processingTime": 0.4 }))
        }),
    );
    let base = serve(router).await;

    let text = collaborators(&base)
        .generator
        .generate(&GenerationRequest::chat("prompt", "context", "ws-1"))
        .await
        .expect("generate");
    assert_eq!(text, "Here is the summary.");
}

#[tokio::test]
async fn unconfigured_endpoint_is_reported() {
    let collaborators = HttpCollaborators::from_config(&EndpointsConfig::default()).expect("build");
    let err = collaborators
        .generator
        .generate(&GenerationRequest::chat("prompt", "context", "ws-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotConfigured(_)));
}
