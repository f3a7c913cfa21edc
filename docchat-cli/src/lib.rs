//! # docchat-cli
//!
//! The `docchat` binary.
//!
//! ```bash
//! docchat ingest --store local --source-dir ./pdfs --collection pdf_docs
//! docchat chat   --store local --collection pdf_docs --history-dir ./histories
//! docchat agent  --store pgvector --collection pdf_docs
//! docchat serve  --store pgvector --collection pdf_docs --addr 0.0.0.0:8000
//! ```
//!
//! `GEMINI_API_KEY` is always required. The pgvector backend reads
//! `PGVECTOR_CONNECTION_STRING` or the `PG_*` variables. A `.env` file in
//! the working directory is loaded first.

pub mod app;
pub mod cli;
pub mod console;
pub mod telemetry;

pub use app::run;
pub use cli::Cli;
pub use telemetry::init_logging;
