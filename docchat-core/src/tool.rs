//! Tools a model can call.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::llm::ToolDeclaration;

/// A capability the model may invoke during an agent loop.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object, if the tool takes any.
    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    async fn execute(&self, args: Value) -> Result<Value>;

    /// The declaration sent to the model.
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}
