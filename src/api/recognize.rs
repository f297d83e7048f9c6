//! The `/recognize` endpoint: audio upload to reply plus device command
//!
//! One request moves one-way through the pipeline: audio, transcript,
//! prompt, model reply, parsed reply. The parsed command is handed to the
//! dispatcher on a spawned task so controller latency or failure never
//! delays or alters the response.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::ApiState;
use crate::intent::{build_intent_prompt, parse_reply};

/// Build recognize router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/recognize", post(recognize))
        .with_state(state)
}

/// Successful recognition response
#[derive(Debug, Serialize)]
pub struct RecognizeResponse {
    pub transcription: String,
    pub reply: String,
    pub command: String,
    pub raw_response: String,
}

/// Recognize an uploaded audio clip and relay any device command
async fn recognize(
    State(state): State<Arc<ApiState>>,
    multipart: Multipart,
) -> Result<Json<RecognizeResponse>, RecognizeError> {
    let audio = read_audio_field(multipart).await?;
    tracing::info!(bytes = audio.len(), "received audio upload");

    let transcription = state
        .transcriber
        .transcribe(&audio)
        .await
        .map_err(|e| RecognizeError::TranscriptionFailed(e.to_string()))?;

    let user_text = transcription.text.trim().to_string();
    if user_text.is_empty() {
        return Err(RecognizeError::EmptyTranscription);
    }
    tracing::info!(transcript = %user_text, "transcription");

    let prompt = build_intent_prompt(&user_text);

    let reply = state
        .model
        .generate(&prompt)
        .await
        .map_err(|e| RecognizeError::GenerationFailed(e.to_string()))?;
    tracing::debug!(reply = %reply.raw, "model reply");

    let parsed = parse_reply(&reply.raw);

    // Dispatch off the response path; the outcome is logged inside the
    // dispatcher and intentionally invisible to the client.
    if parsed.has_command() {
        let dispatcher = state.dispatcher.clone();
        let command = parsed.command.clone();
        tokio::spawn(async move {
            dispatcher.dispatch(&command).await;
        });
    }

    Ok(Json(RecognizeResponse {
        transcription: user_text,
        reply: parsed.spoken_text,
        command: parsed.command,
        raw_response: reply.raw,
    }))
}

/// Pull the `file` field out of the multipart upload
async fn read_audio_field(mut multipart: Multipart) -> Result<Vec<u8>, RecognizeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| RecognizeError::NoAudio)?
    {
        if field.name() == Some("file") {
            let data = field.bytes().await.map_err(|_| RecognizeError::NoAudio)?;
            if data.is_empty() {
                return Err(RecognizeError::NoAudio);
            }
            return Ok(data.to_vec());
        }
    }
    Err(RecognizeError::NoAudio)
}

/// Recognize endpoint errors
///
/// Input errors are the caller's to fix (400); upstream adapter failures are
/// reported as 500 and not retried. Dispatch failures never appear here.
#[derive(Debug)]
pub enum RecognizeError {
    NoAudio,
    EmptyTranscription,
    TranscriptionFailed(String),
    GenerationFailed(String),
}

impl IntoResponse for RecognizeError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        let (status, error) = match self {
            Self::NoAudio => (StatusCode::BAD_REQUEST, "No audio uploaded"),
            Self::EmptyTranscription => (StatusCode::BAD_REQUEST, "Empty transcription"),
            Self::TranscriptionFailed(msg) => {
                tracing::error!(error = %msg, "transcription failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Transcription failed")
            }
            Self::GenerationFailed(msg) => {
                tracing::error!(error = %msg, "model generation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Model generation failed")
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
