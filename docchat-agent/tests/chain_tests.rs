mod common;

use std::sync::Arc;

use common::{EchoInstructionLlm, retriever_with};
use docchat_agent::{ChainError, RagChain};
use docchat_core::{Message, Role};
use docchat_model::MockLlm;
use docchat_session::{ConversationHistory, InMemoryHistory};

#[tokio::test]
async fn empty_retrieval_still_instructs_dont_know() {
    let (_dir, retriever) = retriever_with(&[], 4).await;
    let chain = RagChain::new(Arc::new(EchoInstructionLlm), retriever);
    let history = InMemoryHistory::new();

    let answer = chain.answer(&history, "What is X?").await.unwrap();
    assert!(answer.contains("don't know"), "{answer}");
    assert!(answer.contains("Context:\n(no passages retrieved)"), "{answer}");
    assert_eq!(history.messages().await.len(), 2);
}

#[tokio::test]
async fn prompt_holds_passages_history_and_question() {
    let (_dir, retriever) = retriever_with(&["X is a thing.", "Zebras are striped."], 1).await;
    let llm = Arc::new(MockLlm::new("mock").with_text("X is a thing."));
    let chain = RagChain::new(llm.clone(), retriever);

    let history = InMemoryHistory::new();
    history.append(&[Message::user("hello"), Message::assistant("hi")]).await.unwrap();

    let answer = chain.answer(&history, "What is X?").await.unwrap();
    assert_eq!(answer, "X is a thing.");

    let request = &llm.requests()[0];
    let system = request.system_instruction.as_deref().unwrap();
    assert!(system.contains("[1] X is a thing."), "{system}");
    assert!(!system.contains("[2]"));
    assert!(request.tools.is_empty());
    assert_eq!(
        request.messages,
        vec![Message::user("hello"), Message::assistant("hi"), Message::user("What is X?")]
    );

    let stored = history.messages().await;
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[2], Message::user("What is X?"));
    assert_eq!(stored[3], Message::assistant("X is a thing."));
}

#[tokio::test]
async fn blank_question_is_rejected_before_any_call() {
    let (_dir, retriever) = retriever_with(&["X is a thing."], 4).await;
    let llm = Arc::new(MockLlm::new("mock"));
    let chain = RagChain::new(llm.clone(), retriever);
    let history = InMemoryHistory::new();

    assert!(matches!(chain.answer(&history, "   ").await, Err(ChainError::EmptyQuestion)));
    assert_eq!(llm.call_count(), 0);
    assert!(history.messages().await.is_empty());
}

#[tokio::test]
async fn model_failure_leaves_history_untouched() {
    let (_dir, retriever) = retriever_with(&["X is a thing."], 4).await;
    let chain = RagChain::new(Arc::new(MockLlm::new("empty")), retriever);
    let history = InMemoryHistory::new();

    assert!(matches!(chain.answer(&history, "What is X?").await, Err(ChainError::Model(_))));
    assert!(history.messages().await.is_empty());
}

#[tokio::test]
async fn history_window_limits_what_the_model_sees() {
    let (_dir, retriever) = retriever_with(&["X is a thing."], 4).await;
    let llm = Arc::new(MockLlm::new("mock").with_text("ok"));
    let chain = RagChain::new(llm.clone(), retriever).with_history_window(2);

    let history = InMemoryHistory::new();
    for i in 0..3 {
        history
            .append(&[Message::user(format!("q{i}")), Message::assistant(format!("a{i}"))])
            .await
            .unwrap();
    }

    chain.answer(&history, "next").await.unwrap();
    let sent = &llm.requests()[0].messages;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], Message::user("q2"));
    assert_eq!(sent[2].role, Role::User);
    assert_eq!(history.messages().await.len(), 8);
}
