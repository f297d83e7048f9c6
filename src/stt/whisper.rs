//! Local Whisper transcription engine
//!
//! The model context is loaded once at startup and shared read-only across
//! requests; each transcription runs on its own `WhisperState`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{Transcriber, Transcription};
use crate::{Error, Result, audio};

/// Whisper engine wrapping a loaded model context
pub struct WhisperEngine {
    context: WhisperContext,
    language: Option<String>,
    n_threads: i32,
}

impl WhisperEngine {
    /// Load a Whisper model from a ggml file
    ///
    /// # Errors
    ///
    /// Returns error if the model file is missing or fails to load
    pub fn load(model_path: &Path, language: Option<String>, n_threads: i32) -> Result<Self> {
        tracing::info!(path = %model_path.display(), "loading Whisper model");

        if !model_path.exists() {
            return Err(Error::Config(format!(
                "Whisper model file not found: {}",
                model_path.display()
            )));
        }

        let path = model_path
            .to_str()
            .ok_or_else(|| Error::Config("invalid Whisper model path".to_string()))?;

        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| Error::Config(format!("failed to load Whisper model: {e:?}")))?;

        tracing::info!("Whisper model loaded");

        Ok(Self {
            context,
            language,
            n_threads,
        })
    }

    /// Transcribe 16 kHz mono samples
    ///
    /// Blocking; callers on the async runtime should run this on a blocking
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns error if inference fails
    pub fn transcribe_samples(&self, samples: &[f32]) -> Result<String> {
        if samples.is_empty() {
            return Err(Error::Transcription("empty audio".to_string()));
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        if let Some(ref lang) = self.language {
            params.set_language(Some(lang));
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| Error::Transcription(format!("failed to create state: {e:?}")))?;

        state
            .full(params, samples)
            .map_err(|e| Error::Transcription(format!("inference failed: {e:?}")))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| Error::Transcription(format!("failed to get segments: {e:?}")))?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| Error::Transcription(format!("failed to get segment text: {e:?}")))?;
            text.push_str(&segment);
        }

        Ok(text.trim().to_string())
    }
}

/// Transcriber backed by a shared [`WhisperEngine`]
#[derive(Clone)]
pub struct WhisperTranscriber {
    engine: Arc<WhisperEngine>,
}

impl WhisperTranscriber {
    /// Wrap a loaded engine
    #[must_use]
    pub fn new(engine: Arc<WhisperEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription> {
        let samples = audio::decode_to_samples(audio)?;
        tracing::debug!(samples = samples.len(), "starting Whisper transcription");

        let engine = self.engine.clone();
        let text = tokio::task::spawn_blocking(move || engine.transcribe_samples(&samples))
            .await
            .map_err(|e| Error::Transcription(format!("transcription task failed: {e}")))??;

        tracing::info!(transcript = %text, "transcription complete");
        Ok(Transcription { text })
    }
}
