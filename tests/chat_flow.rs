#![cfg(not(target_arch = "wasm32"))]

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use kos_chatbot::app::{initialize_app, FirebaseAppSettings, FirebaseOptions};
use kos_chatbot::auth::{get_auth, User};
use kos_chatbot::chat::{
    render_message, Chatbot, ChatbotConfig, FileSessionStorage, SessionStorage,
    CONNECTION_ERROR_TEXT,
};
use kos_chatbot::request::RetryPolicy;
use serde_json::json;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent";

fn config(server: &MockServer) -> ChatbotConfig {
    let mut config = ChatbotConfig::new("integration-key");
    config.api_base = server.url("/v1beta/models/");
    config.retry = RetryPolicy::new(3, Duration::from_millis(10), 2.0).unwrap();
    config
}

fn session_dir(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("kos-chat-it-{}-{}", name, std::process::id()));
    path
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_round_trip_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .query_param("key", "integration-key")
                .header("content-type", "application/json")
                .body_contains("\"google_search\"");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "**Biryani** is our *top* dish." }] },
                    "groundingMetadata": {
                        "groundingAttributions": [
                            { "web": { "uri": "https://kos.example/menu", "title": "KOS menu" } }
                        ]
                    }
                }]
            }));
        })
        .await;

    let dir = session_dir("round-trip");
    let storage: Arc<dyn SessionStorage> = Arc::new(FileSessionStorage::new(&dir));
    let chatbot = Chatbot::builder(config(&server))
        .with_storage(storage.clone())
        .build()
        .unwrap();

    let reply = chatbot.send_message("What should I order?").await.unwrap();
    mock.assert_async().await;

    assert_eq!(
        render_message(&reply),
        concat!(
            "<strong>Biryani</strong> is our <em>top</em> dish.",
            r#"<div class="sources">Sources: <a href="https://kos.example/menu" target="_blank" rel="noopener noreferrer">KOS menu</a></div>"#
        )
    );

    let reopened = Chatbot::builder(config(&server))
        .with_storage(storage)
        .build()
        .unwrap();
    assert_eq!(reopened.messages(), chatbot.messages());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test(flavor = "multi_thread")]
async fn rate_limited_service_turns_into_connection_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(429);
        })
        .await;

    let chatbot = Chatbot::builder(config(&server)).build().unwrap();
    let reply = chatbot.send_message("Hello?").await.unwrap();

    assert_eq!(reply.text, CONNECTION_ERROR_TEXT);
    assert_eq!(mock.hits_async().await, 3);
    assert!(!chatbot.is_loading());
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_in_users_get_separate_histories() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Welcome back!" }] } }]
            }));
        })
        .await;

    let app = initialize_app(
        FirebaseOptions::kos_defaults("firebase-key"),
        Some(FirebaseAppSettings {
            name: Some("chat-flow".into()),
            ..Default::default()
        }),
    )
    .unwrap();
    let auth = get_auth(&app).unwrap();
    auth.set_current_user(Some(User::new("user-1").with_email("one@kos.example")))
        .unwrap();

    let dir = session_dir("per-user");
    let storage: Arc<dyn SessionStorage> = Arc::new(FileSessionStorage::new(&dir));
    let chatbot = Chatbot::builder(config(&server))
        .with_storage(storage.clone())
        .with_auth(auth.clone())
        .build()
        .unwrap();
    chatbot.send_message("Hi").await.unwrap();

    auth.set_current_user(Some(User::new("user-2"))).unwrap();
    let other = Chatbot::builder(config(&server))
        .with_storage(storage.clone())
        .with_auth(auth)
        .build()
        .unwrap();

    assert_eq!(other.messages().len(), 1);
    assert!(storage.get("kosChatHistory:user-1").unwrap().is_some());
    assert!(storage.get("kosChatHistory:user-2").unwrap().is_none());

    let _ = std::fs::remove_dir_all(dir);
}
