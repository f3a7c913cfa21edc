//! Per-session history ownership.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::file::FileHistory;
use crate::history::{ConversationHistory, InMemoryHistory};

/// What kind of history a new session gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryBackend {
    InMemory,
    /// `<dir>/<percent-encoded session id>_chat_history.json`.
    File { dir: PathBuf },
}

/// Generate a fresh session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// File name for a session's history. Percent-encoding keeps distinct ids on
/// distinct files and leaves no path separators.
fn history_file_name(id: &str) -> String {
    format!("{}_chat_history.json", urlencoding::encode(id))
}

struct SessionState {
    history: Arc<dyn ConversationHistory>,
    turn: Mutex<()>,
}

/// One session's history plus its turn lock.
#[derive(Clone)]
pub struct SessionHandle {
    id: String,
    state: Arc<SessionState>,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> &dyn ConversationHistory {
        self.state.history.as_ref()
    }

    pub fn shared_history(&self) -> Arc<dyn ConversationHistory> {
        Arc::clone(&self.state.history)
    }

    /// Hold this for the duration of a read-generate-append turn so two
    /// requests on the same session cannot interleave.
    pub async fn lock_turn(&self) -> MutexGuard<'_, ()> {
        self.state.turn.lock().await
    }
}

/// Maps session ids to histories. Sessions are created on first reference and
/// live as long as the registry.
#[derive(Clone)]
pub struct SessionRegistry {
    backend: HistoryBackend,
    sessions: Arc<RwLock<HashMap<String, Arc<SessionState>>>>,
}

impl SessionRegistry {
    pub fn new(backend: HistoryBackend) -> Self {
        Self { backend, sessions: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub fn in_memory() -> Self {
        Self::new(HistoryBackend::InMemory)
    }

    pub fn backend(&self) -> &HistoryBackend {
        &self.backend
    }

    fn create_history(&self, id: &str) -> Arc<dyn ConversationHistory> {
        match &self.backend {
            HistoryBackend::InMemory => Arc::new(InMemoryHistory::new()),
            HistoryBackend::File { dir } => Arc::new(FileHistory::new(
                dir.join(history_file_name(id)),
            )),
        }
    }

    /// The session for `id`, created if this is the first reference.
    /// The same id always yields the same history.
    pub async fn session(&self, id: &str) -> SessionHandle {
        if let Some(state) = self.sessions.read().await.get(id) {
            return SessionHandle { id: id.to_string(), state: Arc::clone(state) };
        }

        let mut sessions = self.sessions.write().await;
        let state = sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(session_id = id, "created session");
                Arc::new(SessionState { history: self.create_history(id), turn: Mutex::new(()) })
            })
            .clone();
        SessionHandle { id: id.to_string(), state }
    }

    /// A live session, or in a file-backed registry one whose history file
    /// is already on disk. Never creates a history.
    pub async fn find(&self, id: &str) -> Option<SessionHandle> {
        if !self.contains(id).await {
            let HistoryBackend::File { dir } = &self.backend else {
                return None;
            };
            let persisted =
                tokio::fs::try_exists(dir.join(history_file_name(id))).await.unwrap_or(false);
            if !persisted {
                return None;
            }
        }
        Some(self.session(id).await)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Forget a session. Returns its handle if it existed; file-backed
    /// history stays on disk.
    pub async fn remove(&self, id: &str) -> Option<SessionHandle> {
        let state = self.sessions.write().await.remove(id)?;
        Some(SessionHandle { id: id.to_string(), state })
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}
