//! # docchat-session
//!
//! Conversation histories and the registry that owns them.
//!
//! - [`ConversationHistory`] is the read/append/clear contract
//! - [`InMemoryHistory`] lives for the process, [`FileHistory`] persists one
//!   JSON file per session
//! - [`SessionRegistry`] maps session ids to histories and serializes turns
//!   within a session
//!
//! ```rust,ignore
//! use docchat_session::{SessionRegistry, new_session_id};
//!
//! let registry = SessionRegistry::in_memory();
//! let session = registry.session(&new_session_id()).await;
//! let _turn = session.lock_turn().await;
//! let history = session.history().messages().await;
//! ```

pub mod error;
pub mod file;
pub mod history;
pub mod registry;

pub use error::{Result, SessionError};
pub use file::FileHistory;
pub use history::{ConversationHistory, InMemoryHistory};
pub use registry::{HistoryBackend, SessionHandle, SessionRegistry, new_session_id};
