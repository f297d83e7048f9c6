//! Homelink - Voice-command relay for smart home device control
//!
//! This library provides the core functionality for the homelink relay:
//! - Audio upload handling and transcription (local Whisper model)
//! - Intent prompting and command-marker extraction
//! - Best-effort command dispatch to an embedded controller
//!
//! # Pipeline
//!
//! ```text
//! audio ──> transcript ──> prompt ──> model reply ──┬──> spoken reply ──> client
//!                                                   │
//!                                                   └──> command token ──> controller
//! ```
//!
//! The two output channels are independent: a failed or slow dispatch to the
//! controller never changes the response returned to the client.

pub mod api;
pub mod audio;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod intent;
pub mod llm;
pub mod stt;

pub use config::Config;
pub use dispatch::{DeviceDispatcher, DispatchOutcome};
pub use error::{Error, Result};
pub use intent::{NO_COMMAND, ParsedReply, build_intent_prompt, parse_reply};
pub use llm::{LanguageModel, ModelReply};
pub use stt::{Transcriber, Transcription};
