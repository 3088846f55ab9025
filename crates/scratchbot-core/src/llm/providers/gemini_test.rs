use super::*;
use crate::test_utils::{MockGeminiServer, MockReply};
use std::time::Instant;

fn client_for(server: &MockGeminiServer) -> GeminiClient {
    GeminiClient::new(Some("test-key".to_string()), "gemini-1.5-flash".to_string())
        .with_base_url(server.address())
}

#[test]
fn test_gemini_client_creation() {
    let client = GeminiClient::new(Some("test-key".to_string()), "gemini-1.5-flash".to_string());
    assert_eq!(client.model(), "gemini-1.5-flash");
    assert_eq!(client.base_url, "https://generativelanguage.googleapis.com/v1beta");
    assert_eq!(client.timeout(), Duration::from_secs(30));
    assert!(client.is_configured());
    assert_eq!(
        client.endpoint(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
    );
}

#[test]
fn test_blank_key_is_not_configured() {
    let client = GeminiClient::new(Some("  ".to_string()), "gemini-1.5-flash".to_string());
    assert!(!client.is_configured());
}

#[test]
fn test_request_body_shape() {
    let client = GeminiClient::new(None, "gemini-1.5-flash".to_string());
    let body = serde_json::to_value(client.build_request("How do I jump?")).unwrap();

    assert_eq!(body["contents"][0]["parts"][0]["text"], "How do I jump?");
    let generation = &body["generationConfig"];
    assert_eq!(generation["topK"], 40);
    assert_eq!(generation["maxOutputTokens"], 1024);
    assert!((generation["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert!((generation["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    assert!(body.get("safetySettings").is_none());
}

#[test]
fn test_request_includes_safety_settings_from_config() {
    let mut config = LlmConfig::default();
    config.safety_settings.push(SafetySetting {
        category: "HARM_CATEGORY_HARASSMENT".to_string(),
        threshold: "BLOCK_LOW_AND_ABOVE".to_string(),
    });
    let client = GeminiClient::from_config(&config);
    let body = serde_json::to_value(client.build_request("hi")).unwrap();

    assert_eq!(body["safetySettings"][0]["category"], "HARM_CATEGORY_HARASSMENT");
    assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_LOW_AND_ABOVE");
}

#[tokio::test]
async fn test_generate_success() {
    let server = MockGeminiServer::start(vec![MockReply::text("Use the [forever] block!")]).await;
    let client = client_for(&server);

    let reply = client.generate("What loops forever?").await.unwrap();
    assert_eq!(reply, "Use the [forever] block!");

    let requests = server.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].call, "gemini-1.5-flash:generateContent");
    assert_eq!(requests[0].key.as_deref(), Some("test-key"));
    assert_eq!(requests[0].body["contents"][0]["parts"][0]["text"], "What loops forever?");

    server.shutdown().await;
}

#[tokio::test]
async fn test_generate_falls_back_when_no_text() {
    let server = MockGeminiServer::start(vec![
        MockReply::raw(200, r#"{"candidates": []}"#),
        MockReply::raw(200, r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#),
        MockReply::raw(200, r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
    ])
    .await;
    let client = client_for(&server);

    for _ in 0..3 {
        assert_eq!(client.generate("hi").await.unwrap(), FALLBACK_REPLY);
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_remote_error_message_is_surfaced() {
    let server = MockGeminiServer::start(vec![MockReply::raw(
        400,
        r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#,
    )])
    .await;
    let client = client_for(&server);

    let err = client.generate("hi").await.unwrap_err();
    assert_eq!(
        err,
        ChatError::Remote {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
        }
    );

    server.shutdown().await;
}

#[tokio::test]
async fn test_non_json_error_uses_generic_message() {
    let server =
        MockGeminiServer::start(vec![MockReply::raw(502, "<html>Bad Gateway</html>")]).await;
    let client = client_for(&server);

    let err = client.generate("hi").await.unwrap_err();
    assert_eq!(err.to_string(), GENERIC_FAILURE);
    assert!(matches!(err, ChatError::Remote { status: 502, .. }));

    server.shutdown().await;
}

#[tokio::test]
async fn test_unparseable_success_body() {
    let server = MockGeminiServer::start(vec![MockReply::raw(200, "not json")]).await;
    let client = client_for(&server);

    let err = client.generate("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Parse(_)));

    server.shutdown().await;
}

#[tokio::test]
async fn test_timeout_is_distinct_from_transport_failure() {
    let server = MockGeminiServer::start(vec![
        MockReply::text("too late").delayed(Duration::from_secs(5)),
    ])
    .await;
    let client = client_for(&server).with_timeout(Duration::from_millis(200));

    let started = Instant::now();
    let timeout_err = client.generate("hi").await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(timeout_err, ChatError::Timeout(Duration::from_millis(200)));

    // Nothing listens on a port we just released
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let unreachable = GeminiClient::new(Some("test-key".to_string()), "gemini-1.5-flash".to_string())
        .with_base_url(format!("http://127.0.0.1:{port}"))
        .with_timeout(Duration::from_secs(5));
    let transport_err = unreachable.generate("hi").await.unwrap_err();

    assert!(matches!(transport_err, ChatError::Transport(_)));
    assert_ne!(timeout_err.to_string(), transport_err.to_string());
    assert!(!transport_err.to_string().contains("test-key"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockGeminiServer::start(vec![MockReply::text("should not be sent")]).await;
    let client = GeminiClient::new(None, "gemini-1.5-flash".to_string()).with_base_url(server.address());

    let err = client.generate("hi").await.unwrap_err();
    assert_eq!(err, ChatError::MissingApiKey);
    assert!(err.is_configuration());
    assert!(server.get_requests().is_empty());

    server.shutdown().await;
}
