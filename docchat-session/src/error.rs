use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting conversation history.
///
/// Reads never fail: an unreadable history is treated as empty.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write history file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SessionError>;
