use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use crate::mcp::errors::{MCPError, MCPResult};
use crate::mcp::tools::{ExecutionContext, MCPTool, ToolError, ToolResult};

/// Tool registry for managing and executing MCP tools.
///
/// Tools keep their registration order, which is also the order
/// `tools/list` reports them in.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn MCPTool>>,
}

/// Tool information for MCP client discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register_tool(&mut self, tool: Box<dyn MCPTool>) -> MCPResult<()> {
        self.validate_tool(tool.as_ref())?;

        debug!("Registering tool: {}", tool.name());
        self.tools.push(tool);
        Ok(())
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|tool| ToolInfo {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.tools.len()
    }

    /// Execute a tool with given parameters and context
    pub async fn execute_tool(
        &self,
        name: &str,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let start_time = Instant::now();
        debug!("Executing tool: {}", name);

        let result = tool.execute(params, context).await;

        info!(
            "Tool {} finished in {:?} ({})",
            name,
            start_time.elapsed(),
            if result.is_ok() { "ok" } else { "error" }
        );
        result
    }

    /// Validate a tool before registration
    fn validate_tool(&self, tool: &dyn MCPTool) -> MCPResult<()> {
        let name = tool.name();
        if name.is_empty() {
            return Err(MCPError::Validation("Tool name cannot be empty".to_string()));
        }

        if self.tools.iter().any(|t| t.name() == name) {
            return Err(MCPError::Validation(format!(
                "Tool '{}' is already registered",
                name
            )));
        }

        if !tool.input_schema().is_object() {
            return Err(MCPError::Validation(
                "Tool input schema must be a JSON object".to_string(),
            ));
        }

        Ok(())
    }
}
