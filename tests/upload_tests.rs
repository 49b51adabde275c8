//! Upload integration tests against a mock backend

use std::path::PathBuf;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_relay::application::ports::{SendError, SpeechSender};
use voice_relay::domain::language::LanguageTag;
use voice_relay::domain::location::GeoPoint;
use voice_relay::infrastructure::HttpSpeechSender;

async fn write_audio(dir: &tempfile::TempDir) -> PathBuf {
    // Finalized spools carry an epoch-millis name and no extension
    let file = dir.path().join("1722556800000");
    tokio::fs::write(&file, b"not-really-flac").await.unwrap();
    file
}

async fn send(
    sender: &HttpSpeechSender,
    file: &std::path::Path,
) -> Result<voice_relay::application::ports::UploadReceipt, SendError> {
    sender
        .send(
            file,
            "audio/flac",
            &LanguageTag::fallback(),
            GeoPoint::new(11.55, 104.92),
            16000,
        )
        .await
}

#[tokio::test]
async fn upload_success_returns_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/voices"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"voiceId": "v-42"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_audio(&dir).await;
    let sender = HttpSpeechSender::with_base_url("test-key", server.uri());

    let receipt = send(&sender, &file).await.unwrap();
    assert_eq!(receipt.voice_id.as_deref(), Some("v-42"));
}

#[tokio::test]
async fn upload_success_without_ack_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/voices"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_audio(&dir).await;
    let sender = HttpSpeechSender::with_base_url("test-key", server.uri());

    let receipt = send(&sender, &file).await.unwrap();
    assert!(receipt.voice_id.is_none());
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/voices"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_audio(&dir).await;
    let sender = HttpSpeechSender::with_base_url("bad-key", server.uri());

    let err = send(&sender, &file).await.unwrap_err();
    assert!(matches!(err, SendError::InvalidApiKey));
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/voices"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_audio(&dir).await;
    let sender = HttpSpeechSender::with_base_url("test-key", server.uri());

    let err = send(&sender, &file).await.unwrap_err();
    assert!(matches!(err, SendError::RateLimited));
}

#[tokio::test]
async fn server_error_maps_to_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/voices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage unavailable"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_audio(&dir).await;
    let sender = HttpSpeechSender::with_base_url("test-key", server.uri());

    let err = send(&sender, &file).await.unwrap_err();
    match err {
        SendError::Backend(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("storage unavailable"));
        }
        other => panic!("expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_file_maps_to_file_read_error() {
    // No server needed; the read fails first
    let sender = HttpSpeechSender::with_base_url("test-key", "http://127.0.0.1:1");

    let err = send(&sender, std::path::Path::new("/nonexistent/1722556800000"))
        .await
        .unwrap_err();
    assert!(matches!(err, SendError::FileRead(_)));
}

#[tokio::test]
async fn unreachable_backend_maps_to_request_failed() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_audio(&dir).await;
    // Port 1 refuses connections
    let sender = HttpSpeechSender::with_base_url("test-key", "http://127.0.0.1:1");

    let err = send(&sender, &file).await.unwrap_err();
    assert!(matches!(err, SendError::RequestFailed(_)));
}
