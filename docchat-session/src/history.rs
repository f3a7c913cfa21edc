//! Conversation history storage.

use async_trait::async_trait;
use docchat_core::Message;
use tokio::sync::RwLock;

use crate::error::Result;

/// An ordered, append-only record of the turns of one conversation.
///
/// `messages()` returns exactly what was appended, in order, since the last
/// `clear()`.
#[async_trait]
pub trait ConversationHistory: Send + Sync {
    /// All stored messages. Never fails; storage problems read as empty.
    async fn messages(&self) -> Vec<Message>;

    async fn append(&self, messages: &[Message]) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}

/// History kept in process memory. Unbounded.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationHistory for InMemoryHistory {
    async fn messages(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    async fn append(&self, messages: &[Message]) -> Result<()> {
        self.messages.write().await.extend_from_slice(messages);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.messages.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_in_order_and_clears() {
        let history = InMemoryHistory::new();
        history.append(&[Message::user("hi"), Message::assistant("hello")]).await.unwrap();
        history.append(&[Message::user("again")]).await.unwrap();

        let messages = history.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2], Message::user("again"));

        history.clear().await.unwrap();
        assert!(history.messages().await.is_empty());
    }
}
