//! Speech-to-text adapter seam

pub mod whisper;

pub use whisper::WhisperTranscriber;

use async_trait::async_trait;

use crate::Result;

/// Result of transcribing one audio clip
#[derive(Debug, Clone)]
pub struct Transcription {
    /// Transcribed text, trimmed. May be empty for silent or unintelligible
    /// audio; rejecting empty text is the caller's responsibility.
    pub text: String,
}

/// Converts raw audio bytes into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an uploaded audio clip
    ///
    /// # Errors
    ///
    /// Returns error if the audio cannot be decoded or inference fails
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription>;
}
