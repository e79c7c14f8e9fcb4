//! MCP tools: the tool trait, the content returned to clients and the
//! registry that dispatches calls by name.

pub mod jira;
pub mod registry;

pub use self::registry::{ToolInfo, ToolRegistry};
pub use crate::mcp::errors::ToolError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::service::IssueService;

/// Core trait that all MCP tools must implement
#[async_trait]
pub trait MCPTool: Send + Sync {
    /// Get the tool name (unique identifier)
    fn name(&self) -> &str;

    /// Get the tool description for documentation
    fn description(&self) -> &str;

    /// Get the JSON schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool with given parameters and context
    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError>;
}

/// What a tool can reach while it runs
#[derive(Clone)]
pub struct ExecutionContext {
    pub service: Arc<IssueService>,
}

/// Tool execution result, serialized as the `tools/call` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<Content>,
}

impl ToolResult {
    /// Single text block holding `value` as pretty-printed JSON
    pub fn json<T: Serialize>(value: &T) -> Result<ToolResult, ToolError> {
        Ok(ToolResult {
            content: vec![Content::Text {
                text: serde_json::to_string_pretty(value)?,
            }],
        })
    }
}

/// Content types that tools can return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    /// Plain text content
    #[serde(rename = "text")]
    Text { text: String },
}
