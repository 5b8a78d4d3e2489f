mod common;

use axum::http::StatusCode;
use common::post_chat;
use movie_chat_service::completion::{
    CompletionBackend, CompletionError, CompletionRequest, MAX_OUTPUT_TOKENS, OpenRouterBackend,
};
use movie_chat_service::models::ChatTurn;
use movie_chat_service::tasks::fallback::HORROR_FALLBACK;
use movie_chat_service::{AppState, ChatDependencies, build_router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer, timeout: Duration) -> OpenRouterBackend {
    OpenRouterBackend::new("test-openrouter-key", &server.uri(), timeout)
}

fn request() -> CompletionRequest {
    CompletionRequest {
        model: "openai/gpt-4o-mini".to_string(),
        turns: vec![
            ChatTurn::system("You are a movie buff."),
            ChatTurn::user("hi"),
            ChatTurn::assistant("Hello! Looking for a film?"),
            ChatTurn::user("suggest a scary movie"),
        ],
        temperature: 0.7,
        max_tokens: MAX_OUTPUT_TOKENS,
    }
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_server_error_is_a_provider_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "upstream unavailable", "code": 500 }
        })),
    )
    .await;

    let result = backend_for(&server, Duration::from_secs(5))
        .complete(request())
        .await;
    assert!(matches!(result, Err(CompletionError::Provider(_))));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["model"], "openai/gpt-4o-mini");
}

#[tokio::test]
async fn test_non_json_body_is_a_provider_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>gateway hiccup</html>"),
    )
    .await;

    let result = backend_for(&server, Duration::from_secs(5))
        .complete(request())
        .await;
    assert!(matches!(result, Err(CompletionError::Provider(_))));
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "openai/gpt-4o-mini",
            "choices": []
        })),
    )
    .await;

    let result = backend_for(&server, Duration::from_secs(5))
        .complete(request())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(500).set_delay(Duration::from_secs(2)),
    )
    .await;

    let timeout = Duration::from_millis(200);
    let result = backend_for(&server, timeout).complete(request()).await;
    assert!(matches!(result, Err(CompletionError::Timeout(t)) if t == timeout));
}

#[tokio::test]
async fn test_failing_provider_yields_fallback_reply() {
    for response in [
        ResponseTemplate::new(500).set_body_string("upstream broke"),
        ResponseTemplate::new(200).set_body_string("not json"),
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-2",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "openai/gpt-4o-mini",
            "choices": []
        })),
        ResponseTemplate::new(200).set_delay(Duration::from_secs(2)),
    ] {
        let server = MockServer::start().await;
        mount(&server, response).await;

        let backend = backend_for(&server, Duration::from_millis(500));
        let deps = ChatDependencies {
            catalog: None,
            completion: Some(Arc::new(backend) as Arc<dyn CompletionBackend>),
        };
        let app = build_router(AppState::new(&deps, "alina"));

        let (status, body) = post_chat(app, json!({ "message": "suggest a scary movie" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["origin"], "fallback");
        assert_eq!(body["reply"], HORROR_FALLBACK);
    }
}
