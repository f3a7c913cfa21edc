//! Scripted model for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use docchat_core::{CoreError, Llm, LlmRequest, LlmResponse, Message, Result};

/// A [`Llm`] that replays queued responses in order and records every
/// request it receives. Once the script runs out, calls fail with
/// [`CoreError::Model`].
///
/// ```rust,ignore
/// let llm = MockLlm::new("mock").with_text("X is a thing.");
/// ```
#[derive(Debug, Default)]
pub struct MockLlm {
    name: String,
    responses: Mutex<VecDeque<LlmResponse>>,
    requests: Mutex<Vec<LlmRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Queue a response.
    pub fn with_response(self, response: LlmResponse) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Queue a plain-text assistant reply.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(LlmResponse::new(Message::assistant(text)))
    }

    /// Queue an assistant message with arbitrary content.
    pub fn with_message(self, message: Message) -> Self {
        self.with_response(LlmResponse::new(message))
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        lock(&self.requests).push(request);
        lock(&self.responses)
            .pop_front()
            .ok_or_else(|| CoreError::Model(format!("{}: no scripted response left", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_and_records() {
        let llm = MockLlm::new("mock").with_text("one").with_text("two");
        let first = llm.generate(LlmRequest::new(vec![Message::user("a")])).await.unwrap();
        let second = llm.generate(LlmRequest::default()).await.unwrap();
        assert_eq!(first.message, Message::assistant("one"));
        assert_eq!(second.message, Message::assistant("two"));
        assert!(llm.generate(LlmRequest::default()).await.is_err());
        assert_eq!(llm.call_count(), 3);
        assert_eq!(llm.requests()[0].messages, vec![Message::user("a")]);
    }
}
