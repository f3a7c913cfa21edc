//! Command-line arguments.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use docchat_rag::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

pub const DEFAULT_PERSIST_DIR: &str = "./chroma_store";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Parser)]
#[command(name = "docchat")]
#[command(about = "Chat with a collection of ingested documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, chunk, embed and store a directory of documents
    Ingest {
        #[command(flatten)]
        store: StoreArgs,

        /// Directory holding the PDFs (or text exports) to ingest
        #[arg(long, alias = "pdf-dir")]
        source_dir: PathBuf,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
        chunk_overlap: usize,
    },

    /// Interactive retrieve-then-answer chat
    Chat {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Interactive chat with an agent that calls `pdf_search`
    Agent {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Serve the chain and the agent over HTTP
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        /// Persist session histories under this directory
        #[arg(long)]
        history_dir: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Collections stored as files under `--persist-dir`
    #[value(alias = "chroma")]
    Local,
    /// PostgreSQL with pgvector, configured from the environment
    Pgvector,
}

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Vector store backend
    #[arg(long, value_enum)]
    pub store: StoreKind,

    /// Collection to write to or read from
    #[arg(long)]
    pub collection: String,

    /// Where the local backend keeps its collections
    #[arg(long, default_value = DEFAULT_PERSIST_DIR)]
    pub persist_dir: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Resume or name a conversation; a fresh id is generated otherwise
    #[arg(long)]
    pub session_id: Option<String>,

    /// Persist the conversation under this directory
    #[arg(long)]
    pub history_dir: Option<PathBuf>,
}
