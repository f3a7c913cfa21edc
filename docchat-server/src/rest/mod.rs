pub mod controllers;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use controllers::{chat, health, sessions};

/// All docchat routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/chat", post(chat::chain_chat))
        .route("/agent/chat", post(chat::agent_chat))
        .route("/sessions/{id}", delete(sessions::delete_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
