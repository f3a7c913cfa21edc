//! # docchat-model
//!
//! Language model integrations for docchat.
//!
//! - [`GeminiModel`] calls Gemini over REST (`gemini` feature, on by default)
//! - [`MockLlm`] replays scripted responses for tests
//!
//! ```rust,ignore
//! use docchat_model::{GeminiConfig, GeminiModel};
//!
//! let model = GeminiModel::new(GeminiConfig::from_env()?)?;
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;
pub mod mock;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiModel};
pub use mock::MockLlm;
