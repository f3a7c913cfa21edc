//! Retrieval exposed as a tool for the agent loop.
//!
//! The agent calls the tool with `{ "query": "..." }` and gets back the
//! formatted passages as a JSON string.

use async_trait::async_trait;
use docchat_core::{CoreError, Tool};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::retriever::{Retriever, format_passages};

/// Returned when retrieval finds nothing.
pub const NO_PASSAGES_FOUND: &str = "No relevant passages found in the PDFs.";

/// A [`Tool`] named `pdf_search` that wraps a [`Retriever`].
pub struct PdfSearchTool {
    retriever: Retriever,
}

impl PdfSearchTool {
    pub fn new(retriever: Retriever) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for PdfSearchTool {
    fn name(&self) -> &str {
        "pdf_search"
    }

    fn description(&self) -> &str {
        "Searches the embedded PDF knowledge base for passages relevant to the query."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to look for in the ingested documents"
                }
            },
            "required": ["query"]
        }))
    }

    async fn execute(&self, args: Value) -> docchat_core::Result<Value> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CoreError::Tool("missing required 'query' parameter".into()))?;

        info!(query, collection = self.retriever.collection(), "pdf_search tool called");

        let results = self.retriever.retrieve(query).await.map_err(|e| {
            error!(error = %e, "pdf_search failed");
            CoreError::Tool(format!("pdf_search failed: {e}"))
        })?;

        if results.is_empty() {
            return Ok(Value::String(NO_PASSAGES_FOUND.to_string()));
        }
        Ok(Value::String(format_passages(&results)))
    }
}
