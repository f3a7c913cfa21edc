//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{EmbeddedChunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of embedded chunks. Collections
/// are append-only: there is no update or delete.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::{LocalVectorStore, VectorStore};
///
/// let store = LocalVectorStore::create("./chroma_store")?;
/// store.create_collection("docs", 3072).await?;
/// store.add("docs", &embedded).await?;
/// let results = store.search("docs", &query_embedding, 4).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name used in errors and log lines.
    fn backend_name(&self) -> &str;

    /// Where collections live, for user-facing messages.
    fn location(&self) -> String {
        self.backend_name().to_string()
    }

    /// Verify the backend can be reached. Called before any embedding work.
    ///
    /// Fails with [`RagError::StoreUnavailable`](crate::RagError::StoreUnavailable)
    /// when it cannot.
    async fn health_check(&self) -> Result<()>;

    /// Whether a named collection exists.
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Append embedded chunks to a collection.
    async fn add(&self, collection: &str, chunks: &[EmbeddedChunk]) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score. A collection
    /// that does not exist yields an empty result.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
