//! The generation boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::message::Message;

/// A tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Everything a single generation call needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    pub system_instruction: Option<String>,
    /// Conversation so far, oldest first. The last entry is usually the
    /// message the model should respond to.
    pub messages: Vec<Message>,
    /// Tools the model may call. Empty means plain generation.
    pub tools: Vec<ToolDeclaration>,
}

impl LlmRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, ..Default::default() }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.tools = tools;
        self
    }
}

/// The model's reply to an [`LlmRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub message: Message,
    pub finish_reason: Option<String>,
}

impl LlmResponse {
    pub fn new(message: Message) -> Self {
        Self { message, finish_reason: None }
    }
}

/// A language model.
///
/// Retry and timeout policy belong to implementations; callers make exactly
/// one `generate` call per model turn.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Model identifier, used for logging.
    fn name(&self) -> &str;

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;
}
