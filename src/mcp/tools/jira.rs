//! Jira tools exposed over MCP.
//!
//! Each tool reads its arguments from the `tools/call` arguments object,
//! delegates to the issue service and returns the shared ticket projections
//! as a pretty-printed JSON text block.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::mcp::tools::{ExecutionContext, MCPTool, ToolError, ToolResult};
use crate::views::{summaries, TicketDetail, TransitionList};

/// All Jira tools in the order `tools/list` reports them
pub fn jira_tools() -> Vec<Box<dyn MCPTool>> {
    vec![
        Box::new(GetTicketTool),
        Box::new(SearchTicketsTool),
        Box::new(SearchTicketsByTextTool),
        Box::new(GetTicketsByProjectTool),
        Box::new(GetMyAssignedTicketsTool),
        Box::new(GetRecentlyUpdatedTicketsTool),
        Box::new(GetTicketTransitionsTool),
        Box::new(ChangeTicketStatusTool),
    ]
}

// Missing or non-string arguments read as empty; the service rejects them.
fn str_arg<'a>(params: &'a Value, name: &str) -> &'a str {
    params.get(name).and_then(Value::as_str).unwrap_or("")
}

fn max_results(params: &Value) -> Result<Option<u32>, ToolError> {
    match params.get("max_results") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                ToolError::InvalidParams(format!(
                    "max_results must be a non-negative integer, got {}",
                    value
                ))
            }),
    }
}

fn max_results_schema() -> Value {
    json!({
        "type": "integer",
        "description": "Maximum number of results to return",
        "default": 50
    })
}

fn ticket_key_schema() -> Value {
    json!({
        "type": "string",
        "description": "The Jira ticket key (e.g., 'PROJ-123')"
    })
}

/// Tool for fetching one ticket with its detailed view
pub struct GetTicketTool;

#[async_trait]
impl MCPTool for GetTicketTool {
    fn name(&self) -> &str {
        "get_ticket"
    }

    fn description(&self) -> &str {
        "Retrieves details of a specific Jira ticket by its key"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticket_key": ticket_key_schema()
            },
            "required": ["ticket_key"]
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let ticket = context
            .service
            .get_ticket(str_arg(&params, "ticket_key"))
            .await?;
        ToolResult::json(&TicketDetail::from(&ticket))
    }
}

pub struct SearchTicketsTool;

#[async_trait]
impl MCPTool for SearchTicketsTool {
    fn name(&self) -> &str {
        "search_tickets"
    }

    fn description(&self) -> &str {
        "Searches for Jira tickets matching the given JQL query"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "jql_query": {
                    "type": "string",
                    "description": "JQL query string (e.g., 'project = PROJ AND status = \"In Progress\"')"
                },
                "max_results": max_results_schema()
            },
            "required": ["jql_query"]
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let limit = max_results(&params)?;
        let tickets = context
            .service
            .search_tickets(str_arg(&params, "jql_query"), limit)
            .await?;
        ToolResult::json(&summaries(&tickets))
    }
}

pub struct SearchTicketsByTextTool;

#[async_trait]
impl MCPTool for SearchTicketsByTextTool {
    fn name(&self) -> &str {
        "search_tickets_by_text"
    }

    fn description(&self) -> &str {
        "Searches for Jira tickets containing specific text"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text to search for in ticket summaries and descriptions"
                },
                "max_results": max_results_schema()
            },
            "required": ["text"]
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let limit = max_results(&params)?;
        let tickets = context
            .service
            .search_tickets_by_text(str_arg(&params, "text"), limit)
            .await?;
        ToolResult::json(&summaries(&tickets))
    }
}

pub struct GetTicketsByProjectTool;

#[async_trait]
impl MCPTool for GetTicketsByProjectTool {
    fn name(&self) -> &str {
        "get_tickets_by_project"
    }

    fn description(&self) -> &str {
        "Gets all tickets for a specific Jira project"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_key": {
                    "type": "string",
                    "description": "The Jira project key (e.g., 'PROJ')"
                },
                "max_results": max_results_schema()
            },
            "required": ["project_key"]
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let limit = max_results(&params)?;
        let tickets = context
            .service
            .get_tickets_by_project(str_arg(&params, "project_key"), limit)
            .await?;
        ToolResult::json(&summaries(&tickets))
    }
}

pub struct GetMyAssignedTicketsTool;

#[async_trait]
impl MCPTool for GetMyAssignedTicketsTool {
    fn name(&self) -> &str {
        "get_my_assigned_tickets"
    }

    fn description(&self) -> &str {
        "Gets all Jira tickets assigned to the current user"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "max_results": max_results_schema()
            },
            "required": []
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let tickets = context
            .service
            .get_my_assigned_tickets(max_results(&params)?)
            .await?;
        ToolResult::json(&summaries(&tickets))
    }
}

pub struct GetRecentlyUpdatedTicketsTool;

#[async_trait]
impl MCPTool for GetRecentlyUpdatedTicketsTool {
    fn name(&self) -> &str {
        "get_recently_updated_tickets"
    }

    fn description(&self) -> &str {
        "Gets recently updated Jira tickets from the last 7 days"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "max_results": max_results_schema()
            },
            "required": []
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let tickets = context
            .service
            .get_recently_updated_tickets(max_results(&params)?)
            .await?;
        ToolResult::json(&summaries(&tickets))
    }
}

pub struct GetTicketTransitionsTool;

#[async_trait]
impl MCPTool for GetTicketTransitionsTool {
    fn name(&self) -> &str {
        "get_ticket_transitions"
    }

    fn description(&self) -> &str {
        "Get available status transitions for a Jira ticket"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticket_key": ticket_key_schema()
            },
            "required": ["ticket_key"]
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let transitions = context
            .service
            .get_transitions(str_arg(&params, "ticket_key"))
            .await?;
        ToolResult::json(&TransitionList { transitions })
    }
}

/// Tool for moving a ticket through its workflow
pub struct ChangeTicketStatusTool;

#[async_trait]
impl MCPTool for ChangeTicketStatusTool {
    fn name(&self) -> &str {
        "change_ticket_status"
    }

    fn description(&self) -> &str {
        "Change the status of a Jira ticket (e.g., 'In Progress', 'Done', 'To Do')"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticket_key": ticket_key_schema(),
                "status_name": {
                    "type": "string",
                    "description": "The target status name or transition name"
                }
            },
            "required": ["ticket_key", "status_name"]
        })
    }

    async fn execute(
        &self,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let outcome = context
            .service
            .change_status(
                str_arg(&params, "ticket_key"),
                str_arg(&params, "status_name"),
            )
            .await?;
        ToolResult::json(&outcome)
    }
}
