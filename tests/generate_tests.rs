//! Generation client tests against a stubbed backend.

use std::net::TcpListener;

use bytes::Bytes;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infinitalk::{
    ClientError, GenerationClient, GenerationRequest, ImageFormat, SessionConfig, Voice,
};

/// Minimal JPEG-tagged payload for request construction.
const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x10, 0x4A, 0x46, 0x49, 0x46];

fn find_available_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn sample_request() -> GenerationRequest {
    GenerationRequest::new(
        Bytes::from_static(FAKE_JPEG),
        ImageFormat::Jpeg,
        "Hello! I am a digital avatar.",
        Voice::AriaNeural,
    )
    .unwrap()
}

fn config_for(server: &MockServer) -> SessionConfig {
    let mut config = SessionConfig::new();
    config.set_base_url(&server.uri());
    config
}

#[tokio::test]
async fn test_generate_success_returns_body_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(b"\x00\x01VIDEO".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GenerationClient::new().unwrap();
    let video = client
        .generate(&config_for(&mock_server), &sample_request())
        .await
        .unwrap();

    assert_eq!(video, Bytes::from_static(b"\x00\x01VIDEO"));
}

#[tokio::test]
async fn test_generate_500_passes_body_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overload"))
        .mount(&mock_server)
        .await;

    let client = GenerationClient::new().unwrap();
    let result = client
        .generate(&config_for(&mock_server), &sample_request())
        .await;

    match result {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "model overload");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_non_200_success_status_is_server_error() {
    // Only 200 carries video. A 201/202-class answer is a backend problem
    // report, not an MP4, and must not reach the success path.
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(201).set_body_string("queued for processing"))
        .mount(&mock_server)
        .await;

    let client = GenerationClient::new().unwrap();
    let result = client
        .generate(&config_for(&mock_server), &sample_request())
        .await;

    match result {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, 201);
            assert_eq!(message, "queued for processing");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_timeout_is_connection_error() {
    // A hung request resolves only via its timeout, and a timeout is
    // connection-class, never server-class.
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = GenerationClient::with_timeout(std::time::Duration::from_millis(200)).unwrap();
    let result = client
        .generate(&config_for(&mock_server), &sample_request())
        .await;

    match result {
        Err(ClientError::Connection(reason)) => assert!(!reason.is_empty()),
        Err(ClientError::Server { .. }) => panic!("timeout misclassified as server error"),
        other => panic!("expected connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_unreachable_is_connection_error() {
    let port = find_available_port();
    let mut config = SessionConfig::new();
    config.set_base_url(&format!("http://127.0.0.1:{port}"));

    let client = GenerationClient::new().unwrap();
    let result = client.generate(&config, &sample_request()).await;

    // Connection failures must stay distinct from server errors: the two
    // point the user at different remediations.
    match result {
        Err(ClientError::Connection(reason)) => assert!(!reason.is_empty()),
        other => panic!("expected connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_without_url_makes_no_network_call() {
    let mock_server = MockServer::start().await;

    let client = GenerationClient::new().unwrap();
    let result = client
        .generate(&SessionConfig::new(), &sample_request())
        .await;
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_generate_sends_expected_multipart_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GenerationClient::new().unwrap();
    client
        .generate(&config_for(&mock_server), &sample_request())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    // The body is multipart-encoded; the part headers and text payloads are
    // plain text inside it, so substring checks are enough to pin the wire
    // contract: field names, filename, MIME type, script, and voice id.
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="image""#));
    assert!(body.contains(r#"filename="avatar.jpg""#));
    assert!(body.contains("image/jpeg"));
    assert!(body.contains(r#"name="text""#));
    assert!(body.contains("Hello! I am a digital avatar."));
    assert!(body.contains(r#"name="voice""#));
    assert!(body.contains("en-US-AriaNeural"));
}
