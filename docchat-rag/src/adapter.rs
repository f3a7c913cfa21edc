//! Binding of a vector store, an embedding provider and a collection name.
//!
//! [`VectorStoreAdapter`] is the single place where chunks are embedded and
//! written, and where the chat side checks that a collection was ingested.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{DEFAULT_TOP_K, StoreBackend};
use crate::document::{Chunk, EmbeddedChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::local::LocalVectorStore;
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// How a store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Ingestion may create the persistence directory and collections.
    Ingest,
    /// Chat never creates anything.
    Chat,
}

/// Build the vector store selected by `backend`.
///
/// Nothing is contacted here: remote reachability is checked by
/// [`VectorStore::health_check`] before the first real operation.
///
/// # Errors
///
/// - [`RagError::Io`] if the local directory cannot be created in
///   [`OpenMode::Ingest`]
/// - [`RagError::ConfigError`] for a malformed connection string, or when
///   the remote backend is not compiled in
pub fn open_store(backend: &StoreBackend, mode: OpenMode) -> Result<Arc<dyn VectorStore>> {
    match backend {
        StoreBackend::Local { persist_dir } => {
            let store = match mode {
                OpenMode::Ingest => LocalVectorStore::create(persist_dir)?,
                OpenMode::Chat => LocalVectorStore::open(persist_dir),
            };
            Ok(Arc::new(store))
        }
        #[cfg(feature = "pgvector")]
        StoreBackend::Remote { connection_string } => {
            Ok(Arc::new(crate::pgvector::PgVectorStore::connect_lazy(connection_string)?))
        }
        #[cfg(not(feature = "pgvector"))]
        StoreBackend::Remote { .. } => Err(RagError::ConfigError(
            "the pgvector backend is not enabled in this build".to_string(),
        )),
    }
}

/// A vector store bound to one collection and one embedding provider.
///
/// # Example
///
/// ```rust,ignore
/// let adapter = VectorStoreAdapter::new(store, embedder, "pdf_docs");
/// let stored = adapter.add_documents(&chunks).await?;
/// let retriever = adapter.as_retriever(DEFAULT_TOP_K);
/// ```
#[derive(Clone)]
pub struct VectorStoreAdapter {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
}

impl VectorStoreAdapter {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Self {
        Self { store, embedder, collection: collection.into() }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Embed and store `chunks`, returning how many were stored.
    ///
    /// The store is health-checked before anything is embedded, and the
    /// collection is created if it does not exist yet. All chunk texts go to
    /// the provider in a single batch call.
    ///
    /// # Errors
    ///
    /// - [`RagError::StoreUnavailable`] if the backend cannot be reached
    /// - [`RagError::EmbeddingError`] if embedding fails or returns the wrong
    ///   number of vectors
    /// - [`RagError::VectorStoreError`] if the write fails
    pub async fn add_documents(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        self.store.health_check().await?;

        if !self.store.collection_exists(&self.collection).await? {
            self.store.create_collection(&self.collection, self.embedder.dimensions()).await?;
            info!(
                collection = %self.collection,
                backend = self.store.backend_name(),
                "created collection"
            );
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
            error!(collection = %self.collection, error = %e, "embedding failed during ingestion");
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingError {
                provider: "embedding provider".to_string(),
                message: format!(
                    "expected {} embeddings, received {}",
                    chunks.len(),
                    embeddings.len()
                ),
            });
        }

        let embedded: Vec<EmbeddedChunk> = chunks
            .iter()
            .cloned()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
            .collect();

        self.store.add(&self.collection, &embedded).await.inspect_err(|e| {
            error!(collection = %self.collection, error = %e, "failed to store chunks");
        })?;

        let chunk_count = embedded.len();
        info!(collection = %self.collection, chunk_count, "stored chunks");
        Ok(chunk_count)
    }

    /// Fail unless the collection has been ingested.
    ///
    /// # Errors
    ///
    /// - [`RagError::StoreUnavailable`] if the backend cannot be reached
    /// - [`RagError::CollectionNotFound`] if the collection does not exist
    pub async fn ensure_collection_exists(&self) -> Result<()> {
        self.store.health_check().await?;
        if self.store.collection_exists(&self.collection).await? {
            return Ok(());
        }
        Err(RagError::CollectionNotFound {
            collection: self.collection.clone(),
            location: self.store.location(),
        })
    }

    /// A read-only view returning up to `k` passages per query.
    pub fn as_retriever(&self, k: usize) -> Retriever {
        Retriever::new(
            Arc::clone(&self.store),
            Arc::clone(&self.embedder),
            self.collection.clone(),
            if k == 0 { DEFAULT_TOP_K } else { k },
        )
    }
}
