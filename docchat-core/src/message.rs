//! Conversation messages.
//!
//! A [`Message`] is one turn of a conversation. Its [`Content`] is either plain
//! text or a sequence of structured [`Part`]s; model adapters decide which shape
//! to produce at the point where the provider response is decoded, so callers
//! only ever match on the enum.
//!
//! The JSON form is what file-backed histories persist:
//!
//! ```json
//! [
//!   {"role": "user", "content": "hi"},
//!   {"role": "assistant", "content": [{"type": "text", "text": "hello"}]}
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Results of tool invocations fed back to the model.
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A model-initiated tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
    /// Opaque provider token that must be echoed back with the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

/// The result of executing a [`FunctionCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Id of the call this answers.
    pub id: String,
    pub name: String,
    pub response: Value,
}

/// One element of structured message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text { text: String },
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
    /// Provider parts this crate does not interpret (reasoning traces,
    /// executable code, inline data).
    Other { kind: String, payload: Value },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

/// Message content: plain text or structured parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<Part>),
}

impl Content {
    /// The first text-bearing piece of content.
    ///
    /// For [`Content::Text`] this is the string itself (even when empty); for
    /// [`Content::Parts`] it is the first non-empty [`Part::Text`].
    pub fn first_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Parts(parts) => parts.iter().find_map(|part| match part {
                Part::Text { text } if !text.is_empty() => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        match self {
            Content::Text(_) => Vec::new(),
            Content::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    Part::FunctionCall(call) => Some(call),
                    _ => None,
                })
                .collect(),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Content,
}

impl Message {
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, Content::Text(text.into()))
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Content::Text(text.into()))
    }

    /// A tool-role message carrying the given function responses.
    pub fn tool_results(responses: Vec<FunctionResponse>) -> Self {
        Self::new(
            Role::Tool,
            Content::Parts(responses.into_iter().map(Part::FunctionResponse).collect()),
        )
    }

    /// Whether this message asks for at least one tool invocation.
    pub fn has_function_calls(&self) -> bool {
        !self.content.function_calls().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_message_serializes_flat() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn structured_content_round_trips() {
        let raw = json!({
            "role": "assistant",
            "content": [
                {"type": "function_call", "id": "c1", "name": "pdf_search", "args": {"query": "x"}},
                {"type": "text", "text": "looking"}
            ]
        });
        let message: Message = serde_json::from_value(raw.clone()).unwrap();
        assert!(message.has_function_calls());
        assert_eq!(message.content.first_text(), Some("looking"));
        assert_eq!(serde_json::to_value(&message).unwrap(), raw);
    }

    #[test]
    fn first_text_skips_non_text_parts() {
        let content = Content::Parts(vec![
            Part::Other { kind: "thought".into(), payload: json!("...") },
            Part::text(""),
            Part::text("answer"),
        ]);
        assert_eq!(content.first_text(), Some("answer"));
        assert_eq!(Content::Parts(vec![]).first_text(), None);
    }
}
