use std::sync::Arc;

use docchat_agent::{RagChain, RetrievalAgent};
use docchat_session::SessionRegistry;

/// Shared state behind every route.
///
/// Chain and agent conversations are kept in separate registries, so the
/// same session id names two independent histories.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<RagChain>,
    pub agent: Arc<RetrievalAgent>,
    pub chain_sessions: SessionRegistry,
    pub agent_sessions: SessionRegistry,
}

impl AppState {
    pub fn new(chain: RagChain, agent: RetrievalAgent) -> Self {
        Self {
            chain: Arc::new(chain),
            agent: Arc::new(agent),
            chain_sessions: SessionRegistry::in_memory(),
            agent_sessions: SessionRegistry::in_memory(),
        }
    }

    pub fn with_registries(mut self, chain: SessionRegistry, agent: SessionRegistry) -> Self {
        self.chain_sessions = chain;
        self.agent_sessions = agent;
        self
    }
}
