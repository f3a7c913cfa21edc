//! Tool-calling agent loop.
//!
//! The model sees the conversation plus the declared tools. Whenever it asks
//! for tool calls they are executed and their results fed back, until it
//! answers without calling anything or the iteration cap is reached.

use std::sync::Arc;

use docchat_core::{FunctionCall, FunctionResponse, Llm, LlmRequest, Message, Tool};
use docchat_session::ConversationHistory;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{AgentError, AgentResult};
use crate::extract::extract_final_text;

pub const DEFAULT_AGENT_INSTRUCTION: &str = "You are a helpful research assistant. Use the \
     available tools to answer questions about the ingested PDFs. If the information is not in \
     the PDFs, say you don't know.";

pub const DEFAULT_MAX_ITERATIONS: usize = 8;

/// Final message when the model keeps calling tools after the cap.
pub const GAVE_UP_MESSAGE: &str =
    "I couldn't finish researching that question. Please try rephrasing it.";

/// An agent that may call its tools any number of times (up to a cap)
/// before answering.
pub struct RetrievalAgent {
    llm: Arc<dyn Llm>,
    tools: Vec<Arc<dyn Tool>>,
    instruction: String,
    max_iterations: usize,
}

impl RetrievalAgent {
    pub fn builder() -> RetrievalAgentBuilder {
        RetrievalAgentBuilder::default()
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    async fn run_tool(&self, call: &FunctionCall) -> FunctionResponse {
        let response = match self.tools.iter().find(|t| t.name() == call.name) {
            None => {
                warn!(tool = %call.name, "model called an unknown tool");
                json!({ "error": format!("unknown tool '{}'", call.name) })
            }
            Some(tool) => match tool.execute(call.args.clone()).await {
                Ok(value) => value,
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "tool failed");
                    json!({ "error": e.to_string() })
                }
            },
        };
        FunctionResponse { id: call.id.clone(), name: call.name.clone(), response }
    }

    /// Run the loop over `messages` and return them with every model and
    /// tool message appended. The last message is the answer.
    pub async fn invoke(&self, mut messages: Vec<Message>) -> AgentResult<Vec<Message>> {
        let declarations: Vec<_> = self.tools.iter().map(|t| t.declaration()).collect();

        for round in 0..=self.max_iterations {
            let final_round = round == self.max_iterations;
            let tools = if final_round { Vec::new() } else { declarations.clone() };
            let request = LlmRequest::new(messages.clone())
                .with_system_instruction(self.instruction.clone())
                .with_tools(tools);

            let response = self.llm.generate(request).await?;
            let calls: Vec<FunctionCall> =
                response.message.content.function_calls().into_iter().cloned().collect();
            messages.push(response.message);

            if calls.is_empty() {
                debug!(round, "agent answered");
                return Ok(messages);
            }
            if final_round {
                warn!(max_iterations = self.max_iterations, "agent still calling tools after cap");
                break;
            }

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                debug!(round, tool = %call.name, "executing tool call");
                results.push(self.run_tool(call).await);
            }
            messages.push(Message::tool_results(results));
        }

        messages.push(Message::assistant(GAVE_UP_MESSAGE));
        Ok(messages)
    }

    /// One conversational turn. Only the user message and the final answer
    /// are recorded in `history`; tool traffic is not.
    pub async fn chat(
        &self,
        history: &dyn ConversationHistory,
        text: &str,
    ) -> AgentResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        let mut messages = history.messages().await;
        let prior_turns = messages.len();
        messages.push(Message::user(text));

        let transcript = self.invoke(messages).await?;
        let answer = extract_final_text(&transcript);

        history.append(&[Message::user(text), Message::assistant(answer.clone())]).await?;
        info!(
            model = self.llm.name(),
            prior_turns,
            steps = transcript.len() - prior_turns,
            "agent turn completed"
        );
        Ok(answer)
    }
}

/// Builder for [`RetrievalAgent`]. Only the model is required.
pub struct RetrievalAgentBuilder {
    llm: Option<Arc<dyn Llm>>,
    tools: Vec<Arc<dyn Tool>>,
    instruction: String,
    max_iterations: usize,
}

impl Default for RetrievalAgentBuilder {
    fn default() -> Self {
        Self {
            llm: None,
            tools: Vec::new(),
            instruction: DEFAULT_AGENT_INSTRUCTION.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RetrievalAgentBuilder {
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Tool rounds allowed before a final tool-less call.
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn build(self) -> AgentResult<RetrievalAgent> {
        let llm = self.llm.ok_or_else(|| AgentError::Config("llm is required".to_string()))?;
        Ok(RetrievalAgent {
            llm,
            tools: self.tools,
            instruction: self.instruction,
            max_iterations: self.max_iterations,
        })
    }
}
