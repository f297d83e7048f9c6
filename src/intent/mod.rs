//! Intent prompting and command extraction
//!
//! The prompt builder instructs the model to end every reply with a fixed
//! command marker; the parser pulls that marker back out of the free-text
//! reply and separates it from the spoken response.

pub mod parser;
pub mod prompt;

pub use parser::{NO_COMMAND, ParsedReply, parse_reply};
pub use prompt::build_intent_prompt;
