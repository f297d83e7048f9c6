//! Command-marker extraction from model replies
//!
//! Model output is untrusted free text. The only structure we rely on is the
//! marker fragment `{"command": "<value>"}` somewhere in the reply; this is a
//! tolerant pattern match for that exact shape, not a JSON parser. Everything
//! outside the marker is treated as conversational prose.

use std::sync::LazyLock;

use regex::Regex;

/// Sentinel command token meaning "no device directive"
pub const NO_COMMAND: &str = "none";

/// Regex for the embedded command marker
static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{"command":\s*"(.+?)"\}"#).expect("valid regex"));

/// A model reply split into its spoken text and command token
///
/// `spoken_text` never contains a marker substring. `command` is either
/// exactly `"none"` or the verbatim captured marker value; no validation
/// against the device taxonomy happens here (the controller decides what it
/// accepts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub spoken_text: String,
    pub command: String,
}

impl ParsedReply {
    /// Whether the reply carries a dispatchable command
    #[must_use]
    pub fn has_command(&self) -> bool {
        self.command != NO_COMMAND
    }
}

/// Extract the command token from a raw model reply
///
/// First-match-wins: when multiple markers appear, only the first captured
/// value is honored, but every occurrence is stripped from the spoken text.
/// A missing or unparseable marker degrades to `"none"`; this never fails.
#[must_use]
pub fn parse_reply(raw: &str) -> ParsedReply {
    let Some(captures) = MARKER_REGEX.captures(raw) else {
        return ParsedReply {
            spoken_text: raw.trim().to_string(),
            command: NO_COMMAND.to_string(),
        };
    };

    let command = captures[1].to_string();
    let spoken_text = MARKER_REGEX.replace_all(raw, "").trim().to_string();

    ParsedReply {
        spoken_text,
        command,
    }
}
