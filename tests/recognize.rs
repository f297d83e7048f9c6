//! Recognize endpoint integration tests
//!
//! Exercises the full request pipeline in-process with mock transcriber and
//! model adapters; no audio hardware, model files, or network access needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use homelink::api::{ApiServer, ApiState};
use homelink::dispatch::DeviceDispatcher;
use homelink::llm::{LanguageModel, ModelReply};
use homelink::stt::{Transcriber, Transcription};
use homelink::{Error, Result};

const BOUNDARY: &str = "homelink-test-boundary";

/// Transcriber returning a canned result regardless of audio content
struct MockTranscriber {
    result: std::result::Result<String, String>,
}

impl MockTranscriber {
    fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<Transcription> {
        match &self.result {
            Ok(text) => Ok(Transcription { text: text.clone() }),
            Err(message) => Err(Error::Transcription(message.clone())),
        }
    }
}

/// Model returning a canned reply
struct MockModel {
    result: std::result::Result<String, String>,
}

impl MockModel {
    fn ok(raw: &str) -> Self {
        Self {
            result: Ok(raw.to_string()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn generate(&self, _prompt: &str) -> Result<ModelReply> {
        match &self.result {
            Ok(raw) => Ok(ModelReply { raw: raw.clone() }),
            Err(message) => Err(Error::Generation(message.clone())),
        }
    }
}

/// Build a test router; the dispatcher points at a dead port so any dispatch
/// attempt fails fast without a controller
fn test_router(transcriber: MockTranscriber, model: MockModel) -> Router {
    let dispatcher = DeviceDispatcher::new("http://127.0.0.1:1").unwrap();
    let state = Arc::new(ApiState::new(
        Arc::new(transcriber),
        Arc::new(model),
        dispatcher,
    ));
    ApiServer::router(state)
}

/// Build a multipart request carrying one form field
fn multipart_request(field_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"clip.wav\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/recognize")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Empty multipart request with no fields at all
fn empty_multipart_request() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recognize")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(format!("--{BOUNDARY}--\r\n")))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let router = test_router(
        MockTranscriber::ok("hello"),
        MockModel::ok("hi\n{\"command\": \"none\"}"),
    );

    let response = router.oneshot(empty_multipart_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "No audio uploaded"}));
}

#[tokio::test]
async fn wrong_field_name_is_rejected() {
    let router = test_router(
        MockTranscriber::ok("hello"),
        MockModel::ok("hi\n{\"command\": \"none\"}"),
    );

    let response = router
        .oneshot(multipart_request("attachment", b"RIFF...."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No audio uploaded");
}

#[tokio::test]
async fn empty_transcription_is_rejected() {
    let transcriber = MockTranscriber::ok("   \n ");
    let router = test_router(transcriber, MockModel::ok("unused"));

    let response = router
        .oneshot(multipart_request("file", b"RIFF...."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "Empty transcription"}));
}

#[tokio::test]
async fn transcriber_failure_is_a_server_error() {
    let router = test_router(
        MockTranscriber::failing("model exploded"),
        MockModel::ok("unused"),
    );

    let response = router
        .oneshot(multipart_request("file", b"RIFF...."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "Transcription failed"}));
}

#[tokio::test]
async fn model_failure_is_a_server_error() {
    let router = test_router(
        MockTranscriber::ok("turn on the light"),
        MockModel::failing("quota exceeded"),
    );

    let response = router
        .oneshot(multipart_request("file", b"RIFF...."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "Model generation failed"}));
}

#[tokio::test]
async fn successful_recognition_returns_parsed_reply() {
    let raw = "Sure, turning it on.\n{\"command\": \"turn on light\"}";
    let router = test_router(MockTranscriber::ok("turn on the light"), MockModel::ok(raw));

    let response = router
        .oneshot(multipart_request("file", b"RIFF...."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["transcription"], "turn on the light");
    assert_eq!(json["reply"], "Sure, turning it on.");
    assert_eq!(json["command"], "turn on light");
    assert_eq!(json["raw_response"], raw);
}

#[tokio::test]
async fn unreachable_controller_does_not_affect_response() {
    // The test dispatcher points at a dead port, so this exercises a failed
    // dispatch on an otherwise successful request.
    let raw = "Done.\n{\"command\": \"turn off fan\"}";
    let router = test_router(MockTranscriber::ok("turn off the fan"), MockModel::ok(raw));

    let response = router
        .oneshot(multipart_request("file", b"RIFF...."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["reply"], "Done.");
    assert_eq!(json["command"], "turn off fan");
}

#[tokio::test]
async fn reply_without_marker_yields_none_command() {
    let router = test_router(
        MockTranscriber::ok("what's the weather"),
        MockModel::ok("I can't check the weather yet."),
    );

    let response = router
        .oneshot(multipart_request("file", b"RIFF...."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["command"], "none");
    assert_eq!(json["reply"], "I can't check the weather yet.");
}

#[tokio::test]
async fn prompt_embeds_the_transcript() {
    let transcriber = MockTranscriber::ok("switch on the nightlamp");
    let model = MockModel::ok("Okay.\n{\"command\": \"turn on lamp\"}");
    let prompts = Arc::new(std::sync::Mutex::new(Vec::new()));

    // Wrap the mock so we can inspect prompts after the router consumes it
    struct Recording {
        inner: MockModel,
        prompts: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl LanguageModel for Recording {
        async fn generate(&self, prompt: &str) -> Result<ModelReply> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.inner.generate(prompt).await
        }
    }

    let dispatcher = DeviceDispatcher::new("http://127.0.0.1:1").unwrap();
    let state = Arc::new(ApiState::new(
        Arc::new(transcriber),
        Arc::new(Recording {
            inner: model,
            prompts: prompts.clone(),
        }),
        dispatcher,
    ));
    let router = ApiServer::router(state);

    let response = router
        .oneshot(multipart_request("file", b"RIFF...."))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let recorded = prompts.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].contains("User: switch on the nightlamp"));
    assert!(recorded[0].contains("smart home assistant"));
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let router = test_router(MockTranscriber::ok("hi"), MockModel::ok("hi"));

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
