//! # docchat-rag
//!
//! Document ingestion and retrieval for docchat.
//!
//! ## Overview
//!
//! - [`loader`] reads a directory of PDFs (`pdf` feature) and text exports,
//!   one [`Document`] per page
//! - [`BoundaryChunker`] splits documents into overlapping [`Chunk`]s
//! - [`EmbeddingProvider`] turns text into vectors (Gemini with the `gemini`
//!   feature)
//! - [`VectorStore`] persists embedded chunks: [`LocalVectorStore`] on disk,
//!   or PostgreSQL with the `pgvector` feature
//! - [`VectorStoreAdapter`] binds a store, an embedder and a collection;
//!   [`Retriever`] and [`PdfSearchTool`] sit on top of it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docchat_rag::*;
//!
//! let backend = StoreBackend::Local { persist_dir: "./chroma_store".into() };
//! let store = open_store(&backend, OpenMode::Ingest)?;
//! let embedder = Arc::new(GeminiEmbeddingProvider::from_env()?);
//! let adapter = VectorStoreAdapter::new(store, embedder, "pdf_docs");
//!
//! let report = IngestPipeline::new(adapter.clone(), RagConfig::default())?
//!     .ingest_dir("./pdfs")
//!     .await?;
//! let passages = adapter.as_retriever(DEFAULT_TOP_K).retrieve("What is X?").await?;
//! ```

pub mod adapter;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod loader;
pub mod local;
pub mod pipeline;
pub mod retriever;
pub mod tool;
pub mod vectorstore;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "pgvector")]
pub mod pgvector;

pub use adapter::{OpenMode, VectorStoreAdapter, open_store};
pub use chunking::{BoundaryChunker, Chunker, chunk_documents};
pub use config::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K, RagConfig, RagConfigBuilder,
    StoreBackend,
};
pub use document::{Chunk, Document, EmbeddedChunk, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use loader::load_documents;
pub use local::LocalVectorStore;
pub use pipeline::{IngestPipeline, IngestReport};
pub use retriever::{Retriever, format_passages};
pub use tool::{NO_PASSAGES_FOUND, PdfSearchTool};
pub use vectorstore::VectorStore;

#[cfg(feature = "gemini")]
pub use gemini::GeminiEmbeddingProvider;

#[cfg(feature = "pgvector")]
pub use pgvector::PgVectorStore;
