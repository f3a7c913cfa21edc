//! # docchat-core
//!
//! Types shared by every docchat crate: the conversation [`Message`] model,
//! the [`Llm`] generation boundary and the [`Tool`] trait used by the agent
//! loop.

pub mod error;
pub mod llm;
pub mod message;
pub mod tool;

pub use error::{CoreError, Result};
pub use llm::{Llm, LlmRequest, LlmResponse, ToolDeclaration};
pub use message::{Content, FunctionCall, FunctionResponse, Message, Part, Role};
pub use tool::Tool;
