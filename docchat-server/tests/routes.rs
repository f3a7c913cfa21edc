use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use docchat_agent::{RagChain, RetrievalAgent};
use docchat_model::MockLlm;
use docchat_rag::{EmbeddingProvider, LocalVectorStore, VectorStore, VectorStoreAdapter};
use docchat_server::{AppState, ChatResponse, router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct ConstantEmbedder;

#[async_trait]
impl EmbeddingProvider for ConstantEmbedder {
    async fn embed(&self, _text: &str) -> docchat_rag::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        2
    }
}

async fn state(chain_llm: MockLlm, agent_llm: MockLlm) -> (tempfile::TempDir, AppState) {
    let temp = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalVectorStore::create(temp.path()).unwrap());
    store.create_collection("pdf_docs", 2).await.unwrap();
    let adapter = VectorStoreAdapter::new(store, Arc::new(ConstantEmbedder), "pdf_docs");

    let chain = RagChain::new(Arc::new(chain_llm), adapter.as_retriever(4));
    let agent = RetrievalAgent::builder().llm(Arc::new(agent_llm)).build().unwrap();
    (temp, AppState::new(chain, agent))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_service() {
    let (_dir, state) = state(MockLlm::new("c"), MockLlm::new("a")).await;
    let (status, body) =
        send(router(state), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "service": "docchat"}));
}

#[tokio::test]
async fn chat_assigns_and_reuses_session_ids() {
    let (_dir, state) =
        state(MockLlm::new("c").with_text("first").with_text("second"), MockLlm::new("a")).await;
    let app = router(state.clone());

    let (status, body) = send(app.clone(), post("/chat", json!({"message": "What is X?"}))).await;
    assert_eq!(status, StatusCode::OK);
    let first: ChatResponse = serde_json::from_value(body).unwrap();
    assert_eq!(first.response, "first");
    assert!(!first.session_id.is_empty());

    let (_, body) = send(
        app,
        post("/chat", json!({"message": "And Y?", "session_id": first.session_id})),
    )
    .await;
    let second: ChatResponse = serde_json::from_value(body).unwrap();
    assert_eq!(second.session_id, first.session_id);

    let session = state.chain_sessions.session(&first.session_id).await;
    assert_eq!(session.history().messages().await.len(), 4);
    assert!(!state.agent_sessions.contains(&first.session_id).await);
}

#[tokio::test]
async fn agent_chat_uses_its_own_registry() {
    let (_dir, state) = state(MockLlm::new("c"), MockLlm::new("a").with_text("agent says hi")).await;
    let (status, body) = send(
        router(state.clone()),
        post("/agent/chat", json!({"message": "hi", "session_id": "s1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "agent says hi", "session_id": "s1"}));
    assert!(state.agent_sessions.contains("s1").await);
    assert!(!state.chain_sessions.contains("s1").await);
}

#[tokio::test]
async fn empty_message_is_unprocessable() {
    let (_dir, state) = state(MockLlm::new("c"), MockLlm::new("a")).await;
    let (status, body) = send(router(state), post("/chat", json!({"message": "  "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn model_failure_is_a_server_error() {
    let (_dir, state) = state(MockLlm::new("c"), MockLlm::new("a")).await;
    let (status, body) = send(router(state), post("/chat", json!({"message": "q"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"].as_str().unwrap().starts_with("Error processing chat request: "),
        "{body}"
    );
}

#[tokio::test]
async fn delete_clears_known_sessions_only() {
    let (_dir, state) = state(MockLlm::new("c").with_text("ok"), MockLlm::new("a")).await;
    let app = router(state.clone());
    send(app.clone(), post("/chat", json!({"message": "q", "session_id": "s1"}))).await;

    let delete = |id: &str| Request::delete(format!("/sessions/{id}")).body(Body::empty()).unwrap();
    let (status, _) = send(app.clone(), delete("s1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!state.chain_sessions.contains("s1").await);

    let (status, _) = send(app, delete("s1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_reaches_histories_from_an_earlier_run() {
    use docchat_core::Message;
    use docchat_session::{HistoryBackend, SessionRegistry};

    let history_dir = tempfile::tempdir().unwrap();
    let backend = HistoryBackend::File { dir: history_dir.path().to_path_buf() };
    SessionRegistry::new(backend.clone())
        .session("old")
        .await
        .history()
        .append(&[Message::user("q"), Message::assistant("a")])
        .await
        .unwrap();

    let (_dir, state) = state(MockLlm::new("c"), MockLlm::new("a")).await;
    let state = state
        .with_registries(SessionRegistry::new(backend.clone()), SessionRegistry::in_memory());
    let request = Request::delete("/sessions/old").body(Body::empty()).unwrap();
    let (status, _) = send(router(state), request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let reopened = SessionRegistry::new(backend).session("old").await;
    assert!(reopened.history().messages().await.is_empty());
}
