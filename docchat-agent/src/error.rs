use docchat_core::CoreError;
use docchat_rag::RagError;
use docchat_session::SessionError;
use thiserror::Error;

/// Errors from a [`RagChain`](crate::RagChain) turn.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error(transparent)]
    Retrieval(#[from] RagError),

    #[error(transparent)]
    Model(#[from] CoreError),

    #[error(transparent)]
    History(#[from] SessionError),
}

/// Errors from a [`RetrievalAgent`](crate::RetrievalAgent) turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Agent configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Model(#[from] CoreError),

    #[error(transparent)]
    History(#[from] SessionError),
}

pub type ChainResult<T> = std::result::Result<T, ChainError>;

pub type AgentResult<T> = std::result::Result<T, AgentError>;
