//! Core trait definitions for mnemo.
//!
//! These define the contract between the memory store and whatever host
//! drives it (CLI, RPC, embedded call).

use crate::types::{ToolDef, ToolOutput};
use anyhow::Result;
use async_trait::async_trait;

/// Context available to a tool during execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub session_id: String,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// Dispatches tool calls to the right handler.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool call by name.
    async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput>;

    /// List all available tool definitions.
    fn tools(&self) -> Vec<ToolDef>;
}
