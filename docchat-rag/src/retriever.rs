//! Read-only similarity search over one collection.

use std::sync::Arc;

use tracing::debug;

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Embeds a query and returns the `k` most similar passages.
///
/// Built by [`VectorStoreAdapter::as_retriever`](crate::VectorStoreAdapter::as_retriever).
/// A retriever never writes.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
    k: usize,
}

impl Retriever {
    pub(crate) fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: String,
        k: usize,
    ) -> Self {
        Self { store, embedder, collection, k }
    }

    /// Fan-out per query.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Return at most `k` results, most similar first. An empty result is
    /// not an error.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&self.collection, &embedding, self.k).await?;
        debug!(collection = %self.collection, k = self.k, result_count = results.len(), "retrieved passages");
        Ok(results.into_iter().take(self.k).collect())
    }
}

/// Render passages as `[1] text`, `[2] text`, ... separated by blank lines.
pub fn format_passages(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| format!("[{}] {}", i + 1, result.chunk.text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::Chunk;

    fn result(text: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: "d_0".into(),
                text: text.into(),
                index: 0,
                metadata: HashMap::new(),
                document_id: "d".into(),
            },
            score: 0.5,
        }
    }

    #[test]
    fn numbers_and_trims_passages() {
        let rendered = format_passages(&[result("  alpha \n"), result("beta")]);
        assert_eq!(rendered, "[1] alpha\n\n[2] beta");
    }

    #[test]
    fn no_passages_renders_empty() {
        assert_eq!(format_passages(&[]), "");
    }
}
