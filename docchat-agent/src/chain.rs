//! Fixed retrieve-then-generate chat chain.

use std::sync::Arc;

use docchat_core::{Llm, LlmRequest, Message};
use docchat_rag::{Retriever, format_passages};
use docchat_session::ConversationHistory;
use tracing::{debug, info};

use crate::error::{ChainError, ChainResult};
use crate::extract::extract_final_text;

pub const DEFAULT_CHAIN_INSTRUCTION: &str = "You are a helpful assistant answering questions about \
     the ingested PDFs. Answer using only the context below. If the answer is not in the \
     context, say you don't know.";

/// Stands in for the context block when retrieval finds nothing.
pub const NO_PASSAGES_RETRIEVED: &str = "(no passages retrieved)";

/// One retrieval and one model call per question.
///
/// The prompt is the system instruction with a `Context:` block of retrieved
/// passages, then the prior conversation, then the question.
///
/// # Example
///
/// ```rust,ignore
/// let chain = RagChain::new(llm, adapter.as_retriever(DEFAULT_TOP_K));
/// let answer = chain.answer(session.history(), "What is X?").await?;
/// ```
pub struct RagChain {
    llm: Arc<dyn Llm>,
    retriever: Retriever,
    instruction: String,
    history_window: Option<usize>,
}

impl RagChain {
    pub fn new(llm: Arc<dyn Llm>, retriever: Retriever) -> Self {
        Self {
            llm,
            retriever,
            instruction: DEFAULT_CHAIN_INSTRUCTION.to_string(),
            history_window: None,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Send only the last `n` history messages to the model. Stored history
    /// is not affected.
    pub fn with_history_window(mut self, n: usize) -> Self {
        self.history_window = Some(n);
        self
    }

    fn system_instruction(&self, passages: &str) -> String {
        let context = if passages.is_empty() { NO_PASSAGES_RETRIEVED } else { passages };
        format!("{}\n\nContext:\n{context}", self.instruction)
    }

    /// Answer `question` and record the exchange in `history`.
    ///
    /// Exactly two messages are appended on success: the question and the
    /// answer. Nothing is appended when any step fails.
    pub async fn answer(
        &self,
        history: &dyn ConversationHistory,
        question: &str,
    ) -> ChainResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChainError::EmptyQuestion);
        }

        let results = self.retriever.retrieve(question).await?;
        debug!(passage_count = results.len(), "retrieved context");
        let system = self.system_instruction(&format_passages(&results));

        let mut messages = history.messages().await;
        if let Some(n) = self.history_window {
            let skip = messages.len().saturating_sub(n);
            messages.drain(..skip);
        }
        let prior_turns = messages.len();
        messages.push(Message::user(question));

        let response = self
            .llm
            .generate(LlmRequest::new(messages).with_system_instruction(system))
            .await?;
        let answer = extract_final_text(std::slice::from_ref(&response.message));

        history.append(&[Message::user(question), Message::assistant(answer.clone())]).await?;
        info!(
            model = self.llm.name(),
            prior_turns,
            passage_count = results.len(),
            "chain turn completed"
        );
        Ok(answer)
    }
}
