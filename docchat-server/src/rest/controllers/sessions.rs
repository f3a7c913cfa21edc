use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// `DELETE /sessions/{id}`: clear and forget a session in both registries.
/// File-backed sessions from an earlier run are found on disk.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut found = false;
    for registry in [&state.chain_sessions, &state.agent_sessions] {
        let Some(session) = registry.find(&id).await else {
            continue;
        };
        registry.remove(&id).await;
        found = true;
        let _turn = session.lock_turn().await;
        if let Err(e) = session.history().clear().await {
            warn!(session_id = %id, error = %e, "failed to clear history");
            return Err(ApiError::Chat(e.to_string()));
        }
    }

    if !found {
        return Err(ApiError::SessionNotFound(id));
    }
    info!(session_id = %id, "session cleared");
    Ok(StatusCode::NO_CONTENT)
}
