//! Chat panel and backend client against a mock HTTP backend

use serde_json::json;
use std::time::Duration;

use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flightchat::chat::{ChatBackend, ChatPanel, HttpChatClient, SessionId, FALLBACK_REPLY};
use flightchat::config::BackendConfig;
use flightchat::flight_data::FlightData;

mod common;

fn client_for(server: &MockServer) -> HttpChatClient {
    HttpChatClient::new(BackendConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

fn loaded_panel(session: &str) -> ChatPanel {
    let mut panel = ChatPanel::with_session(SessionId::from_string(session));
    panel.set_flight_data(FlightData::from_json_str(common::SAMPLE_FLIGHT).unwrap());
    panel
}

#[tokio::test]
async fn test_send_posts_message_and_session_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "message": "What was the max altitude?",
            "sessionId": "session_42"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "response": "The maximum altitude was 5.25m."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut panel = loaded_panel("session_42");
    panel.set_input("What was the max altitude?");

    assert!(panel.send_message(&client).await);

    let last = panel.messages().last().unwrap();
    assert_eq!(last.content, "The maximum altitude was 5.25m.");
    assert!(!panel.is_busy());
    assert!(panel.take_scroll_request());
}

#[tokio::test]
async fn test_server_error_becomes_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut panel = loaded_panel("session_1");
    panel.set_input("Any GPS issues?");
    let before = panel.messages().len();

    assert!(panel.send_message(&client).await);

    assert_eq!(panel.messages().len(), before + 2);
    assert_eq!(panel.messages().last().unwrap().content, FALLBACK_REPLY);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn test_malformed_body_becomes_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "wrong field"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client
        .send(&flightchat::chat::ChatRequest {
            message: "hi".to_string(),
            session_id: SessionId::from_string("s"),
        })
        .await
        .is_err());

    let mut panel = loaded_panel("s");
    panel.set_input("hi");
    panel.send_message(&client).await;
    assert_eq!(panel.messages().last().unwrap().content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_connection_refused_becomes_fallback() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    drop(server);

    let mut panel = loaded_panel("s");
    panel.set_input("hello?");
    assert!(panel.send_message(&client).await);
    assert_eq!(panel.messages().last().unwrap().content, FALLBACK_REPLY);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn test_configured_timeout_becomes_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "too late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = HttpChatClient::new(BackendConfig {
        base_url: server.uri(),
        request_timeout_seconds: Some(1),
        ..Default::default()
    })
    .unwrap();

    let mut panel = loaded_panel("s");
    panel.set_input("slow question");
    panel.send_message(&client).await;
    assert_eq!(panel.messages().last().unwrap().content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_only_one_request_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut panel = loaded_panel("s");

    panel.set_input("first");
    let pending = panel.begin_send().unwrap();

    panel.set_input("second");
    assert!(!panel.send_message(&client).await);

    let outcome = client.send(pending.request()).await;
    panel.complete_send(pending, outcome);

    assert_eq!(panel.messages().last().unwrap().content, "ok");
    assert_eq!(panel.input(), "second");
}

#[tokio::test]
async fn test_upload_log_returns_decoded_flight_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload-log"))
        .and(query_param("session_id", "session_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"GPS": [{"timestamp": 0.0}, {"timestamp": 12.0}], "ATT": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, log) = common::temp_file("00000001.BIN", "not really a log");
    let client = client_for(&server);
    let data = client
        .upload_log(&log, &SessionId::from_string("session_7"))
        .await
        .unwrap();

    let mut panel = ChatPanel::with_session(SessionId::from_string("session_7"));
    panel.set_flight_data(data);
    assert_eq!(panel.summary().duration, Some(12.0));
    assert_eq!(panel.messages().len(), 1);
}

#[tokio::test]
async fn test_upload_log_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload-log"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "bad log"})))
        .mount(&server)
        .await;

    let (_dir, log) = common::temp_file("broken.BIN", "x");
    let err = client_for(&server)
        .upload_log(&log, &SessionId::from_string("s"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_upload_log_failed_envelope_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload-log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "unsupported log format",
            "data": {"GPS": []}
        })))
        .mount(&server)
        .await;

    let (_dir, log) = common::temp_file("odd.BIN", "x");
    let err = client_for(&server)
        .upload_log(&log, &SessionId::from_string("s"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unsupported log format"));
}

#[tokio::test]
async fn test_fetch_anomalies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/anomalies"))
        .and(query_param("session_id", "session_9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "anomalies": [{
                "type": "low_battery",
                "timestamp": 80.0,
                "severity": "high",
                "description": "Low battery voltage: 10.2V"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let anomalies = client_for(&server)
        .fetch_anomalies(&SessionId::from_string("session_9"))
        .await
        .unwrap();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].description, "Low battery voltage: 10.2V");
}

#[tokio::test]
async fn test_fetch_anomalies_unknown_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/anomalies"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "No flight data found for this session"
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_anomalies(&SessionId::from_string("missing"))
        .await;
    assert!(result.is_err());
}
