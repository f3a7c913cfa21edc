//! # docchat-server
//!
//! HTTP front end for the chain and the agent.
//!
//! | Route | |
//! |---|---|
//! | `GET /health` | liveness |
//! | `POST /chat` | `{message, session_id?}` → `{response, session_id}` via [`RagChain`](docchat_agent::RagChain) |
//! | `POST /agent/chat` | same shape via [`RetrievalAgent`](docchat_agent::RetrievalAgent) |
//! | `DELETE /sessions/{id}` | clear a session |

pub mod error;
pub mod rest;
pub mod state;

use std::net::SocketAddr;

use tracing::info;

pub use error::ApiError;
pub use rest::controllers::chat::{ChatRequest, ChatResponse};
pub use rest::router;
pub use state::AppState;

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "docchat server listening");
    axum::serve(listener, router(state)).await
}
