//! Local file-persisted vector store using cosine similarity.
//!
//! Each collection lives in `<persist_dir>/<percent-encoded name>.json` and is loaded
//! into memory on first use. Writes replace the file through a temporary
//! sibling and a rename, so readers never observe a half-written collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{EmbeddedChunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "local";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CollectionFile {
    dimensions: usize,
    chunks: Vec<EmbeddedChunk>,
}

/// A vector store persisted as JSON files in a local directory.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::{LocalVectorStore, VectorStore};
///
/// let store = LocalVectorStore::create("./chroma_store")?;
/// store.create_collection("docs", 3072).await?;
/// ```
#[derive(Debug)]
pub struct LocalVectorStore {
    dir: PathBuf,
    collections: RwLock<HashMap<String, CollectionFile>>,
}

impl LocalVectorStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| RagError::io(&dir, e))?;
        Ok(Self::open(dir))
    }

    /// Open a store rooted at `dir` without touching the filesystem.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), collections: RwLock::new(HashMap::new()) }
    }

    /// The persistence directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a collection name onto a file name. Percent-encoding keeps
    /// distinct names on distinct files.
    fn collection_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(name)))
    }

    async fn read_file(&self, name: &str) -> Result<Option<CollectionFile>> {
        let path = self.collection_path(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RagError::io(&path, e)),
        };
        serde_json::from_slice(&bytes).map(Some).map_err(|e| RagError::VectorStoreError {
            backend: BACKEND.to_string(),
            message: format!("collection file '{}' is corrupt: {e}", path.display()),
        })
    }

    async fn write_file(&self, name: &str, collection: &CollectionFile) -> Result<()> {
        let path = self.collection_path(name);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(collection).map_err(|e| RagError::VectorStoreError {
            backend: BACKEND.to_string(),
            message: format!("failed to serialize collection '{name}': {e}"),
        })?;
        tokio::fs::write(&tmp, bytes).await.map_err(|e| RagError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| RagError::io(&path, e))?;
        Ok(())
    }

    /// Make sure `name` is in the cache if it exists on disk.
    async fn load(&self, name: &str) -> Result<bool> {
        if self.collections.read().await.contains_key(name) {
            return Ok(true);
        }
        let Some(file) = self.read_file(name).await? else {
            return Ok(false);
        };
        self.collections.write().await.entry(name.to_string()).or_insert(file);
        Ok(true)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    fn backend_name(&self) -> &str {
        BACKEND
    }

    fn location(&self) -> String {
        format!("local store at '{}'", self.dir.display())
    }

    /// A missing directory just holds no collections; a path that exists but
    /// is not a directory cannot be used.
    async fn health_check(&self) -> Result<()> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(RagError::StoreUnavailable {
                backend: BACKEND.to_string(),
                message: format!("persist path '{}' is not a directory", self.dir.display()),
            });
        }
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        self.load(name).await
    }

    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.load(name).await? {
            return Ok(());
        }
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Ok(());
        }
        let file = CollectionFile { dimensions, chunks: Vec::new() };
        self.write_file(name, &file).await?;
        collections.insert(name.to_string(), file);
        debug!(collection = name, dimensions, dir = %self.dir.display(), "created local collection");
        Ok(())
    }

    async fn add(&self, collection: &str, chunks: &[EmbeddedChunk]) -> Result<()> {
        if !self.load(collection).await? {
            return Err(RagError::VectorStoreError {
                backend: BACKEND.to_string(),
                message: format!("collection '{collection}' does not exist"),
            });
        }

        let mut collections = self.collections.write().await;
        let Some(stored) = collections.get_mut(collection) else {
            return Err(RagError::VectorStoreError {
                backend: BACKEND.to_string(),
                message: format!("collection '{collection}' does not exist"),
            });
        };

        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != stored.dimensions) {
            return Err(RagError::VectorStoreError {
                backend: BACKEND.to_string(),
                message: format!(
                    "chunk '{}' has {} dimensions, collection '{collection}' expects {}",
                    bad.chunk.id,
                    bad.embedding.len(),
                    stored.dimensions
                ),
            });
        }

        let mut updated = stored.clone();
        updated.chunks.extend_from_slice(chunks);
        self.write_file(collection, &updated).await?;
        *stored = updated;

        debug!(collection, count = chunks.len(), "appended chunks to local store");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        if !self.load(collection).await? {
            return Ok(Vec::new());
        }

        let collections = self.collections.read().await;
        let Some(stored) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<SearchResult> = stored
            .chunks
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&entry.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::Chunk;

    fn embedded(id: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            chunk: Chunk {
                id: id.to_string(),
                text: format!("text of {id}"),
                index: 0,
                metadata: HashMap::new(),
                document_id: "doc".to_string(),
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn persists_across_instances() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::create(temp.path()).unwrap();
        store.create_collection("docs", 2).await.unwrap();
        store
            .add("docs", &[embedded("a", vec![1.0, 0.0]), embedded("b", vec![0.0, 1.0])])
            .await
            .unwrap();

        let reopened = LocalVectorStore::open(temp.path());
        assert!(reopened.collection_exists("docs").await.unwrap());
        let results = reopened.search("docs", &[0.9, 0.1], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, "a");
    }

    #[tokio::test]
    async fn add_is_append_only() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::create(temp.path()).unwrap();
        store.create_collection("docs", 2).await.unwrap();
        store.add("docs", &[embedded("a", vec![1.0, 0.0])]).await.unwrap();
        store.add("docs", &[embedded("b", vec![1.0, 0.1])]).await.unwrap();
        let results = store.search("docs", &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn missing_collection_searches_empty_and_rejects_adds() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::create(temp.path()).unwrap();
        assert!(store.search("none", &[1.0], 4).await.unwrap().is_empty());
        assert!(!store.collection_exists("none").await.unwrap());
        assert!(store.add("none", &[embedded("a", vec![1.0])]).await.is_err());
    }

    #[tokio::test]
    async fn rejects_dimension_mismatch() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::create(temp.path()).unwrap();
        store.create_collection("docs", 3).await.unwrap();
        let err = store.add("docs", &[embedded("a", vec![1.0])]).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
    }

    #[tokio::test]
    async fn open_never_creates_the_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("missing");
        let store = LocalVectorStore::open(&dir);
        assert!(store.health_check().await.is_ok());
        assert!(!store.collection_exists("docs").await.unwrap());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn health_check_rejects_a_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("store");
        std::fs::write(&file, "x").unwrap();
        let store = LocalVectorStore::open(&file);
        assert!(matches!(store.health_check().await, Err(RagError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn look_alike_collection_names_use_separate_files() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::create(temp.path()).unwrap();
        for name in ["a.b", "a_b", "a/b"] {
            store.create_collection(name, 2).await.unwrap();
        }
        store.add("a.b", &[embedded("dotted", vec![1.0, 0.0])]).await.unwrap();
        store.add("a_b", &[embedded("underscored", vec![1.0, 0.0])]).await.unwrap();

        let reopened = LocalVectorStore::open(temp.path());
        let dotted = reopened.search("a.b", &[1.0, 0.0], 5).await.unwrap();
        let underscored = reopened.search("a_b", &[1.0, 0.0], 5).await.unwrap();
        assert_eq!(dotted.len(), 1);
        assert_eq!(dotted[0].chunk.id, "dotted");
        assert_eq!(underscored.len(), 1);
        assert_eq!(underscored[0].chunk.id, "underscored");
        assert!(reopened.search("a/b", &[1.0, 0.0], 5).await.unwrap().is_empty());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 3);
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
