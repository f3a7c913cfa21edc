//! Ingestion orchestrator.
//!
//! [`IngestPipeline`] runs load → chunk → embed → store for a directory of
//! source files.
//!
//! # Example
//!
//! ```rust,ignore
//! use docchat_rag::{IngestPipeline, RagConfig, VectorStoreAdapter};
//!
//! let pipeline = IngestPipeline::new(adapter, RagConfig::default())?;
//! let report = pipeline.ingest_dir("./pdfs").await?;
//! println!("stored {} chunks", report.chunk_count);
//! ```

use std::path::Path;

use tracing::{error, info};

use crate::adapter::VectorStoreAdapter;
use crate::chunking::{BoundaryChunker, Chunker};
use crate::config::RagConfig;
use crate::document::Document;
use crate::error::Result;
use crate::loader::load_documents;

/// What an ingestion run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub document_count: usize,
    pub chunk_count: usize,
}

/// Chunks documents and writes them through a [`VectorStoreAdapter`].
pub struct IngestPipeline {
    adapter: VectorStoreAdapter,
    chunker: BoundaryChunker,
}

impl IngestPipeline {
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`](crate::RagError::ConfigError) for
    /// invalid chunk parameters.
    pub fn new(adapter: VectorStoreAdapter, config: RagConfig) -> Result<Self> {
        let chunker = BoundaryChunker::new(config.chunk_size, config.chunk_overlap)?;
        Ok(Self { adapter, chunker })
    }

    pub fn adapter(&self) -> &VectorStoreAdapter {
        &self.adapter
    }

    /// Chunk and store already-loaded documents.
    pub async fn ingest_documents(&self, documents: &[Document]) -> Result<IngestReport> {
        let chunks: Vec<_> = documents.iter().flat_map(|d| self.chunker.chunk(d)).collect();
        info!(
            collection = self.adapter.collection(),
            document_count = documents.len(),
            chunk_count = chunks.len(),
            "chunked documents"
        );

        let stored = self.adapter.add_documents(&chunks).await.inspect_err(|e| {
            error!(collection = self.adapter.collection(), error = %e, "ingestion failed");
        })?;

        Ok(IngestReport { document_count: documents.len(), chunk_count: stored })
    }

    /// Load every eligible file in `dir`, then chunk and store it.
    pub async fn ingest_dir(&self, dir: impl AsRef<Path>) -> Result<IngestReport> {
        let documents = load_documents(dir)?;
        self.ingest_documents(&documents).await
    }
}
