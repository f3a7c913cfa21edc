//! File-backed conversation history.
//!
//! One JSON array per session, rewritten whole on every append through a
//! `<file>.tmp` sibling and a rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use docchat_core::Message;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, SessionError};
use crate::history::ConversationHistory;

/// A [`ConversationHistory`] persisted as a pretty-printed JSON file.
///
/// A missing file is an empty history. A file that cannot be read or parsed
/// is also treated as empty and logged at `warn`; the next append overwrites
/// it.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Vec<Message> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read history, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt history file, starting empty");
                Vec::new()
            }
        }
    }

    async fn store(&self, messages: &[Message]) -> Result<()> {
        let json = serde_json::to_vec_pretty(messages)?;
        let tmp = {
            let mut name = self.path.clone().into_os_string();
            name.push(".tmp");
            PathBuf::from(name)
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SessionError::Write { path: parent.to_path_buf(), source })?;
        }
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| SessionError::Write { path: tmp.clone(), source })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| SessionError::Write { path: self.path.clone(), source })?;
        Ok(())
    }
}

#[async_trait]
impl ConversationHistory for FileHistory {
    async fn messages(&self) -> Vec<Message> {
        self.load().await
    }

    async fn append(&self, messages: &[Message]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.load().await;
        all.extend_from_slice(messages);
        self.store(&all).await?;
        debug!(path = %self.path.display(), message_count = all.len(), "history saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store(&[]).await
    }
}
