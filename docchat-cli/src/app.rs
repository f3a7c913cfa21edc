//! Wiring for each subcommand.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use docchat_agent::{RagChain, RetrievalAgent};
use docchat_core::Llm;
use docchat_model::{GeminiConfig, GeminiModel};
use docchat_rag::{
    DEFAULT_TOP_K, EmbeddingProvider, GeminiEmbeddingProvider, IngestPipeline, OpenMode,
    PdfSearchTool, RagConfig, StoreBackend, VectorStoreAdapter, open_store,
};
use docchat_server::AppState;
use docchat_session::{HistoryBackend, SessionRegistry, new_session_id};
use tracing::info;

use crate::cli::{Cli, Command, SessionArgs, StoreArgs, StoreKind};
use crate::console::{AgentResponder, ChainResponder, run_console};

/// Resolve the store backend. Remote settings come from the environment.
pub fn store_backend(args: &StoreArgs) -> Result<StoreBackend> {
    match args.store {
        StoreKind::Local => Ok(StoreBackend::Local { persist_dir: args.persist_dir.clone() }),
        StoreKind::Pgvector => Ok(StoreBackend::remote_from_env()?),
    }
}

/// Session registry for an optional history directory.
pub fn session_registry(history_dir: Option<&Path>) -> SessionRegistry {
    match history_dir {
        Some(dir) => SessionRegistry::new(HistoryBackend::File { dir: dir.to_path_buf() }),
        None => SessionRegistry::in_memory(),
    }
}

fn chat_model() -> Result<Arc<dyn Llm>> {
    let model = GeminiModel::new(GeminiConfig::from_env()?)?;
    Ok(Arc::new(model))
}

fn embedder() -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(Arc::new(GeminiEmbeddingProvider::from_env()?))
}

/// Open the store for chatting and make sure the collection was ingested.
/// A missing local persist dir is reported as a missing collection.
async fn open_for_chat(
    args: &StoreArgs,
    backend: &StoreBackend,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<VectorStoreAdapter> {
    let store = open_store(backend, OpenMode::Chat)?;
    let adapter = VectorStoreAdapter::new(store, embedder, &args.collection);
    adapter.ensure_collection_exists().await?;
    Ok(adapter)
}

fn build_agent(llm: Arc<dyn Llm>, adapter: &VectorStoreAdapter) -> Result<RetrievalAgent> {
    let tool = PdfSearchTool::new(adapter.as_retriever(DEFAULT_TOP_K));
    Ok(RetrievalAgent::builder().llm(llm).tool(Arc::new(tool)).build()?)
}

pub async fn ingest(
    args: &StoreArgs,
    source_dir: &Path,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<()> {
    let config = RagConfig::builder().chunk_size(chunk_size).chunk_overlap(chunk_overlap).build()?;
    let backend = store_backend(args)?;
    let embedder = embedder()?;

    let store = open_store(&backend, OpenMode::Ingest)?;
    let adapter = VectorStoreAdapter::new(store, embedder, &args.collection);
    let report = IngestPipeline::new(adapter, config)?
        .ingest_dir(source_dir)
        .await
        .with_context(|| format!("ingesting '{}'", source_dir.display()))?;

    info!(
        collection = %args.collection,
        document_count = report.document_count,
        chunk_count = report.chunk_count,
        "ingestion finished"
    );
    println!(
        "Ingestion complete. Stored {} chunks in {}.",
        report.chunk_count,
        backend.label(&args.collection)
    );
    Ok(())
}

pub async fn chat(args: &StoreArgs, session: &SessionArgs) -> Result<()> {
    let backend = store_backend(args)?;
    let llm = chat_model()?;
    let adapter = open_for_chat(args, &backend, embedder()?).await?;

    let chain = RagChain::new(llm, adapter.as_retriever(DEFAULT_TOP_K));
    let handle = open_session(session).await;
    let responder = ChainResponder::new(Arc::new(chain), handle);
    run_console(&format!("Retrieval Chat ({})", backend.label(&args.collection)), &responder).await
}

pub async fn agent(args: &StoreArgs, session: &SessionArgs) -> Result<()> {
    let backend = store_backend(args)?;
    let llm = chat_model()?;
    let adapter = open_for_chat(args, &backend, embedder()?).await?;

    let agent = build_agent(llm, &adapter)?;
    let handle = open_session(session).await;
    let responder = AgentResponder::new(Arc::new(agent), handle);
    run_console(
        &format!("Agentic Retrieval Chat ({})", backend.label(&args.collection)),
        &responder,
    )
    .await
}

async fn open_session(args: &SessionArgs) -> docchat_session::SessionHandle {
    let registry = session_registry(args.history_dir.as_deref());
    let id = args.session_id.clone().unwrap_or_else(new_session_id);
    info!(session_id = %id, persisted = args.history_dir.is_some(), "session opened");
    registry.session(&id).await
}

/// Chain and agent histories get their own subdirectories so one session
/// id never names the same file twice.
fn server_registries(history_dir: Option<&Path>) -> (SessionRegistry, SessionRegistry) {
    let sub = |name: &str| history_dir.map(|dir| dir.join(name));
    let chain: Option<PathBuf> = sub("chain");
    let agent: Option<PathBuf> = sub("agent");
    (session_registry(chain.as_deref()), session_registry(agent.as_deref()))
}

pub async fn serve(
    args: &StoreArgs,
    history_dir: Option<&Path>,
    addr: std::net::SocketAddr,
) -> Result<()> {
    let backend = store_backend(args)?;
    let llm = chat_model()?;
    let adapter = open_for_chat(args, &backend, embedder()?).await?;

    let chain = RagChain::new(Arc::clone(&llm), adapter.as_retriever(DEFAULT_TOP_K));
    let agent = build_agent(llm, &adapter)?;
    let (chain_sessions, agent_sessions) = server_registries(history_dir);
    let state = AppState::new(chain, agent).with_registries(chain_sessions, agent_sessions);

    info!(collection = %args.collection, store = %backend.label(&args.collection), "starting server");
    docchat_server::serve(addr, state).await?;
    Ok(())
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ingest { store, source_dir, chunk_size, chunk_overlap } => {
            ingest(&store, &source_dir, chunk_size, chunk_overlap).await
        }
        Command::Chat { store, session } => chat(&store, &session).await,
        Command::Agent { store, session } => agent(&store, &session).await,
        Command::Serve { store, history_dir, addr } => {
            serve(&store, history_dir.as_deref(), addr).await
        }
    }
}
