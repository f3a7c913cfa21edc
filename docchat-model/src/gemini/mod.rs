//! Gemini provider for docchat.
//!
//! Calls the Generative Language REST API (`models/{model}:generateContent`)
//! without streaming. Function calling is supported: tool declarations are
//! sent as `functionDeclarations` and `functionCall` parts come back as
//! [`Part::FunctionCall`](docchat_core::Part::FunctionCall).
//!
//! # Example
//!
//! ```rust,ignore
//! use docchat_model::gemini::{GeminiConfig, GeminiModel};
//!
//! let model = GeminiModel::new(GeminiConfig::from_env()?)?;
//! ```

mod client;
mod config;
mod convert;

pub use client::GeminiModel;
pub use config::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, GEMINI_API_BASE, GeminiConfig};
