//! Intent prompt construction

/// Phrases the model should interpret as TURN ON
pub const ON_SYNONYMS: [&str; 4] = ["turn on", "switch on", "enable", "start"];

/// Phrases the model should interpret as TURN OFF
pub const OFF_SYNONYMS: [&str; 4] = ["turn off", "switch off", "disable", "stop"];

/// Devices the controller knows about
pub const DEVICES: [&str; 9] = [
    "light", "fan", "ac", "tv", "heater", "pump", "music", "bulb", "nightlamp",
];

/// Build the instruction prompt for interpreting one transcribed utterance
///
/// The caller guarantees `user_text` is non-empty and trimmed; the prompt is
/// pure string construction and cannot fail. The produced instruction tells
/// the model to reply conversationally and always terminate with a
/// `{"command": "..."}` marker on its own line.
#[must_use]
pub fn build_intent_prompt(user_text: &str) -> String {
    format!(
        "You are a smart home assistant.\n\
         \n\
         Your job is to:\n\
         1. Respond like a helpful talking assistant.\n\
         2. If the user message includes a device command (e.g., 'turn on the light'), you:\n\
         \x20  - Understand intent\n\
         \x20  - Respond naturally\n\
         \x20  - Append: {{\"command\": \"turn on light\"}} etc.\n\
         3. Do not categorize a night lamp as a light:\n\
         \x20  - If the user says turn on the night bulb, night lamp, or lamp, the command is \"turn on lamp\"\n\
         \n\
         Recognize control patterns:\n\
         - {on_synonyms} => TURN ON\n\
         - {off_synonyms} => TURN OFF\n\
         \n\
         Recognize devices:\n\
         - {devices}\n\
         \n\
         If no command is detected, respond normally and append {{\"command\": \"none\"}}.\n\
         \n\
         Reply naturally. Always end with {{\"command\": \"...\"}} on a separate line.\n\
         \n\
         User: {user_text}\n\
         Assistant:",
        on_synonyms = quoted_list(&ON_SYNONYMS),
        off_synonyms = quoted_list(&OFF_SYNONYMS),
        devices = DEVICES.join(", "),
    )
}

/// Join phrases as a quoted, comma-separated list
fn quoted_list(phrases: &[&str]) -> String {
    phrases
        .iter()
        .map(|p| format!("\"{p}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
