//! Error types shared across the docchat crates.

use thiserror::Error;

/// Errors raised at the model and tool boundaries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The generation call failed (transport, API status, malformed reply).
    #[error("Model error: {0}")]
    Model(String),

    /// A tool rejected its arguments or failed while executing.
    #[error("Tool error: {0}")]
    Tool(String),

    /// Missing or invalid configuration for a model or tool.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
