//! Language model adapter seam

pub mod gemini;

pub use gemini::GeminiModel;

use async_trait::async_trait;

use crate::Result;

/// Raw reply from the language model
///
/// Opaque free text; it may or may not contain an embedded command marker.
/// Extraction happens in [`crate::intent`].
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub raw: String,
}

/// Generates a reply for an intent prompt
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send the prompt to the model and return its reply text
    ///
    /// # Errors
    ///
    /// Returns error if the model call fails or yields no text
    async fn generate(&self, prompt: &str) -> Result<ModelReply>;
}
