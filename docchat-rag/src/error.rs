//! Error types for the `docchat-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in ingestion and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid chunk parameters or missing connection settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The vector store backend cannot be reached.
    #[error("Vector store unavailable ({backend}): {message}")]
    StoreUnavailable {
        /// The vector store backend that could not be reached.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A collection expected to hold ingested data does not exist.
    #[error("Collection '{collection}' not found in {location}. Ingest documents first.")]
    CollectionNotFound {
        /// The requested collection.
        collection: String,
        /// Where the store looked for it.
        location: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The ingestion source directory does not exist.
    #[error("Source directory '{}' does not exist.", .0.display())]
    SourceNotFound(PathBuf),

    /// The ingestion source path is not a directory.
    #[error("'{}' is not a directory.", .0.display())]
    SourceNotDirectory(PathBuf),

    /// The ingestion source directory holds no eligible documents.
    #[error("No documents found in '{}'.", .0.display())]
    NoDocuments(PathBuf),

    /// A PDF could not be parsed or its text could not be extracted.
    #[error("Failed to read PDF '{}': {message}", .path.display())]
    PdfError {
        /// The PDF being read.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// Filesystem failure while reading sources or persisting a collection.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl RagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RagError::Io { path: path.into(), source }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
