use axum::Json;
use axum::extract::State;
use docchat_session::{SessionRegistry, new_session_id};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

fn validate(request: &ChatRequest) -> Result<(), ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::Validation("message must not be empty".to_string()));
    }
    Ok(())
}

fn resolve_session_id(request: &ChatRequest) -> String {
    request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(new_session_id)
}

async fn open_session(
    registry: &SessionRegistry,
    request: &ChatRequest,
) -> docchat_session::SessionHandle {
    registry.session(&resolve_session_id(request)).await
}

/// `POST /chat`: one turn of the retrieve-then-generate chain.
pub async fn chain_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    validate(&request)?;
    let session = open_session(&state.chain_sessions, &request).await;
    let _turn = session.lock_turn().await;

    let response = state.chain.answer(session.history(), &request.message).await.map_err(|e| {
        error!(session_id = session.id(), error = %e, "chain chat failed");
        ApiError::Chat(e.to_string())
    })?;

    info!(session_id = session.id(), "chain chat answered");
    Ok(Json(ChatResponse { response, session_id: session.id().to_string() }))
}

/// `POST /agent/chat`: one turn of the tool-calling agent.
pub async fn agent_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    validate(&request)?;
    let session = open_session(&state.agent_sessions, &request).await;
    let _turn = session.lock_turn().await;

    let response = state.agent.chat(session.history(), &request.message).await.map_err(|e| {
        error!(session_id = session.id(), error = %e, "agent chat failed");
        ApiError::Chat(e.to_string())
    })?;

    info!(session_id = session.id(), "agent chat answered");
    Ok(Json(ChatResponse { response, session_id: session.id().to_string() }))
}
