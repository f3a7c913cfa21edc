#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use docchat_core::{Content, FunctionCall, Llm, LlmRequest, LlmResponse, Message, Part, Role};
use docchat_rag::{
    Document, EmbeddingProvider, LocalVectorStore, Retriever, VectorStore, VectorStoreAdapter,
    chunk_documents,
};
use serde_json::json;
use tempfile::TempDir;

const DIM: usize = 26;

/// Letter-frequency embedding, enough to rank passages by shared letters.
pub struct LetterEmbedder;

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    async fn embed(&self, text: &str) -> docchat_rag::Result<Vec<f32>> {
        let mut v = vec![0.0; DIM];
        for c in text.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
            v[c as usize - 'a' as usize] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// A retriever over a fresh local collection holding `passages`.
pub async fn retriever_with(passages: &[&str], k: usize) -> (TempDir, Retriever) {
    let temp = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalVectorStore::create(temp.path()).unwrap());
    store.create_collection("pdf_docs", DIM).await.unwrap();

    let adapter = VectorStoreAdapter::new(store, Arc::new(LetterEmbedder), "pdf_docs");
    let docs: Vec<Document> = passages
        .iter()
        .enumerate()
        .map(|(i, text)| Document::new(format!("doc{i}"), *text))
        .collect();
    adapter.add_documents(&chunk_documents(&docs, 1000, 150).unwrap()).await.unwrap();
    (temp, adapter.as_retriever(k))
}

/// Replies with its own system instruction.
pub struct EchoInstructionLlm;

#[async_trait]
impl Llm for EchoInstructionLlm {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, request: LlmRequest) -> docchat_core::Result<LlmResponse> {
        Ok(LlmResponse::new(Message::assistant(request.system_instruction.unwrap_or_default())))
    }
}

pub fn tool_call(name: &str, query: &str) -> Message {
    Message::new(
        Role::Assistant,
        Content::Parts(vec![Part::FunctionCall(FunctionCall {
            id: format!("call-{query}"),
            name: name.to_string(),
            args: json!({ "query": query }),
            thought_signature: None,
        })]),
    )
}
