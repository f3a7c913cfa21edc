//! # docchat-agent
//!
//! The two ways docchat answers questions:
//!
//! - [`RagChain`]: retrieve passages, then make exactly one model call
//! - [`RetrievalAgent`]: let the model call `pdf_search` (or any
//!   [`Tool`](docchat_core::Tool)) as often as it needs, up to a cap
//!
//! Both read the prior conversation from a
//! [`ConversationHistory`](docchat_session::ConversationHistory) and append
//! the question and the final answer to it.

pub mod agent;
pub mod chain;
pub mod error;
pub mod extract;

pub use agent::{
    DEFAULT_AGENT_INSTRUCTION, DEFAULT_MAX_ITERATIONS, GAVE_UP_MESSAGE, RetrievalAgent,
    RetrievalAgentBuilder,
};
pub use chain::{DEFAULT_CHAIN_INSTRUCTION, NO_PASSAGES_RETRIEVED, RagChain};
pub use error::{AgentError, AgentResult, ChainError, ChainResult};
pub use extract::{NO_RESPONSE, UNPARSEABLE_RESPONSE, extract_final_text};
