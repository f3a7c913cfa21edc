//! Turning the agent's message list into a single answer string.

use docchat_core::{Content, Message};

pub const NO_RESPONSE: &str = "No response.";

pub const UNPARSEABLE_RESPONSE: &str = "Could not parse the agent response.";

/// The answer carried by the last message. Never fails: an empty list or a
/// structured message without text yields a fixed sentinel.
pub fn extract_final_text(messages: &[Message]) -> String {
    let Some(last) = messages.last() else {
        return NO_RESPONSE.to_string();
    };
    match &last.content {
        Content::Text(text) => text.clone(),
        parts @ Content::Parts(_) => {
            parts.first_text().unwrap_or(UNPARSEABLE_RESPONSE).to_string()
        }
    }
}
