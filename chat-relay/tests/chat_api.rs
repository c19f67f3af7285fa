//! Router-level tests for `POST /chat` using the recording mock provider.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chat_relay::models::{ConversationTurn, Role};
use chat_relay::services::providers::mock::MockChatProvider;
use chat_relay::services::relay::{EMPTY_REPLY_FALLBACK, INVALID_MESSAGE_REPLY, SERVER_ERROR_REPLY};
use chat_relay::startup::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(provider: &Arc<MockChatProvider>) -> Router {
    build_router(AppState::new(common::test_config(false), provider.clone()))
}

async fn post_chat(app: Router, body: Body) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    post_chat(app, Body::from(body.to_string())).await
}

#[tokio::test]
async fn blank_message_returns_400_without_calling_provider() {
    let provider = Arc::new(MockChatProvider::replying("unused"));

    let (status, body) = post_json(app(&provider), json!({"message": "  ", "history": []})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"response": "Please enter a valid message."}));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn missing_message_returns_400() {
    let provider = Arc::new(MockChatProvider::replying("unused"));

    let (status, body) = post_json(app(&provider), json!({"history": ["hi"]})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], INVALID_MESSAGE_REPLY);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn malformed_body_returns_400() {
    let provider = Arc::new(MockChatProvider::replying("unused"));

    let (status, body) = post_chat(app(&provider), Body::from("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], INVALID_MESSAGE_REPLY);

    let (status, _) = post_json(app(&provider), json!({"message": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn string_history_is_normalized_before_the_call() {
    let provider = Arc::new(MockChatProvider::replying("Some advice"));

    let (status, body) = post_json(
        app(&provider),
        json!({"message": "hello", "history": ["hi", "there"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Some advice"}));

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].message, "hello");
    assert_eq!(
        calls[0].history,
        vec![
            ConversationTurn::new(Role::User, "hi"),
            ConversationTurn::new(Role::Model, "there"),
        ]
    );
}

#[tokio::test]
async fn mixed_history_keeps_structured_turns_and_drops_junk() {
    let provider = Arc::new(MockChatProvider::replying("ok"));

    let (status, _) = post_json(
        app(&provider),
        json!({
            "message": "what next?",
            "history": [
                {"role": "user", "parts": ["I have a headache"]},
                {"unexpected": true},
                "Drink water",
                7,
                "Still hurts"
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.calls()[0].history,
        vec![
            ConversationTurn::new(Role::User, "I have a headache"),
            ConversationTurn::new(Role::Model, "Drink water"),
            ConversationTurn::new(Role::User, "Still hurts"),
        ]
    );
}

#[tokio::test]
async fn non_array_history_is_treated_as_empty() {
    for history in [json!("abc"), json!({"a": 1}), json!(5)] {
        let provider = Arc::new(MockChatProvider::replying("Some advice"));

        let (status, body) =
            post_json(app(&provider), json!({"message": "hello", "history": history})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Some advice"}));
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].history.is_empty());
    }
}

#[tokio::test]
async fn provider_failure_returns_500_with_generic_body() {
    let provider = Arc::new(MockChatProvider::failing("upstream exploded: secret detail"));

    for message in ["hello", "  tell me about sleep  "] {
        let (status, body) = post_json(app(&provider), json!({"message": message, "history": []})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"response": SERVER_ERROR_REPLY}));
    }
}

#[tokio::test]
async fn blank_reply_is_replaced_with_fallback() {
    let provider = Arc::new(MockChatProvider::replying(" \n "));

    let (status, body) = post_json(app(&provider), json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], EMPTY_REPLY_FALLBACK);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let provider = Arc::new(MockChatProvider::replying("ok"));

    let response = app(&provider)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-request-id", "req-42")
                .body(Body::from(json!({"message": "hi"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let provider = Arc::new(MockChatProvider::replying("ok"));

    let response = app(&provider)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/chat")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert_eq!(provider.call_count(), 0);
}
