//! Configuration management for the homelink relay

use std::path::PathBuf;

use crate::{Error, Result};

/// Default Gemini model identifier
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Whisper model path
pub const DEFAULT_WHISPER_MODEL: &str = "models/ggml-base.en.bin";

/// Homelink relay configuration
///
/// Loaded once at startup and validated there; request handlers receive the
/// derived adapters, never the raw configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Device controller address, e.g. "192.168.4.1" or "192.168.4.1:80"
    pub controller_addr: String,

    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini model identifier for intent interpretation
    pub gemini_model: String,

    /// Path to the Whisper model file (ggml format)
    pub whisper_model: PathBuf,

    /// Transcription language (None for auto-detection)
    pub stt_language: Option<String>,

    /// Number of threads for Whisper inference
    pub stt_threads: i32,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or a value is invalid
    pub fn load() -> Result<Self> {
        let controller_addr = std::env::var("HOMELINK_CONTROLLER_ADDR")
            .map_err(|_| Error::Config("HOMELINK_CONTROLLER_ADDR is not set".to_string()))?;

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is not set".to_string()))?;

        let gemini_model = std::env::var("HOMELINK_GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        let whisper_model = std::env::var("HOMELINK_WHISPER_MODEL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WHISPER_MODEL));

        let stt_language = match std::env::var("HOMELINK_STT_LANGUAGE") {
            Ok(lang) if lang.is_empty() || lang == "auto" => None,
            Ok(lang) => Some(lang),
            Err(_) => Some("en".to_string()),
        };

        let stt_threads = std::env::var("HOMELINK_STT_THREADS")
            .ok()
            .map_or(Ok(4), |s| {
                s.parse::<i32>().map_err(|_| {
                    Error::Config(format!("HOMELINK_STT_THREADS is not a number: {s}"))
                })
            })?;

        let config = Self {
            controller_addr,
            gemini_api_key,
            gemini_model,
            whisper_model,
            stt_language,
            stt_threads,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checked once at startup; requests are not re-validated.
    ///
    /// # Errors
    ///
    /// Returns error if a value is empty or the model file is missing
    pub fn validate(&self) -> Result<()> {
        if self.controller_addr.trim().is_empty() {
            return Err(Error::Config("controller address is empty".to_string()));
        }
        if self.gemini_api_key.trim().is_empty() {
            return Err(Error::Config("Gemini API key is empty".to_string()));
        }
        if self.stt_threads < 1 {
            return Err(Error::Config(format!(
                "stt_threads must be at least 1, got {}",
                self.stt_threads
            )));
        }
        if !self.whisper_model.exists() {
            return Err(Error::Config(format!(
                "Whisper model file not found: {}",
                self.whisper_model.display()
            )));
        }
        Ok(())
    }

    /// Base URL for the device controller, normalizing a bare host address
    #[must_use]
    pub fn controller_url(&self) -> String {
        let addr = self.controller_addr.trim().trim_end_matches('/');
        if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        }
    }
}
