//! MCP server: JSON-RPC method dispatch over the Jira tool registry.
//!
//! The server is transport-agnostic. HTTP hands it one body at a time and
//! the stdio transport feeds it line by line; both get back at most one
//! message to send.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::mcp::{
    errors::{MCPError, MCPResult, ProtocolError},
    protocol::{
        ClientInfo, InitializeResult, MCPMessage, MCPNotification, MCPRequest, MessageParser,
        ServerCapabilities, ServerInfo,
    },
    tools::{jira::jira_tools, ExecutionContext, ToolRegistry},
    transport::MCPTransport,
    MCP_PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
};
use crate::service::IssueService;

/// MCP Server implementation
pub struct MCPServer {
    tool_registry: ToolRegistry,
    context: ExecutionContext,
}

impl MCPServer {
    /// Create a server with every Jira tool registered
    pub fn new(service: Arc<IssueService>) -> MCPResult<Self> {
        let mut tool_registry = ToolRegistry::new();
        for tool in jira_tools() {
            tool_registry.register_tool(tool)?;
        }
        info!("Registered {} Jira tools", tool_registry.len());

        Ok(Self {
            tool_registry,
            context: ExecutionContext { service },
        })
    }

    /// Serve one connection until the peer closes it
    pub async fn handle_connection(&self, transport: &mut dyn MCPTransport) -> MCPResult<()> {
        info!("MCP connection opened");

        loop {
            let reply = match transport.receive().await {
                Ok(Some(message)) => self.handle_message(message).await,
                Ok(None) => break,
                Err(MCPError::Protocol(e)) => {
                    warn!("Rejecting unreadable message: {}", e);
                    Some(MCPMessage::error_response(Value::Null, e.into()))
                }
                Err(e) => {
                    error!("Transport error: {}", e);
                    return Err(e);
                }
            };

            if let Some(reply) = reply {
                transport.send(reply).await?;
            }
        }

        info!("MCP connection closed");
        Ok(())
    }

    /// Handle a raw JSON body; `None` means nothing should be sent back
    pub async fn handle_raw(&self, data: &[u8]) -> Option<MCPMessage> {
        match MessageParser::parse_message(data) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!("Rejecting unreadable message: {}", e);
                Some(MCPMessage::error_response(Value::Null, e.into()))
            }
        }
    }

    /// Handle a single message
    pub async fn handle_message(&self, message: MCPMessage) -> Option<MCPMessage> {
        if let Err(e) = message.validate() {
            warn!("Invalid JSON-RPC message: {}", e);
            let id = message.id.unwrap_or(Value::Null);
            return Some(MCPMessage::error_response(id, e.into()));
        }

        if let Ok(request) = message.as_request() {
            return Some(self.handle_request(request).await);
        }

        if let Ok(notification) = message.as_notification() {
            self.handle_notification(notification);
        } else {
            warn!("Received unexpected message type");
        }
        None
    }

    /// Handle a request message
    async fn handle_request(&self, request: MCPRequest) -> MCPMessage {
        debug!("Handling request: {}", request.method);

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_tool_call(request.params).await,
            "ping" => Ok(json!({})),
            _ => Err(MCPError::Protocol(ProtocolError::MethodNotFound(
                request.method.clone(),
            ))),
        };

        match response {
            Ok(result) => MCPMessage::response(request.id, result),
            Err(error) => {
                error!("Error in {}: {}", request.method, error);
                MCPMessage::error_response(request.id, error.into())
            }
        }
    }

    fn handle_notification(&self, notification: MCPNotification) {
        debug!("Received notification: {}", notification.method);
    }

    fn handle_initialize(&self, params: Option<Value>) -> MCPResult<Value> {
        let client = params
            .and_then(|p| p.get("clientInfo").cloned())
            .and_then(|info| serde_json::from_value::<ClientInfo>(info).ok());
        if let Some(client) = client {
            info!("Initializing session for {} {}", client.name, client.version);
        }

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    fn handle_list_tools(&self) -> MCPResult<Value> {
        Ok(json!({ "tools": self.tool_registry.list_tools() }))
    }

    async fn handle_tool_call(&self, params: Option<Value>) -> MCPResult<Value> {
        let params = params.ok_or_else(|| invalid_params("Missing parameters"))?;

        let tool_name = params["name"]
            .as_str()
            .ok_or_else(|| invalid_params("Missing tool name"))?;
        let arguments = match params.get("arguments") {
            Some(Value::Null) | None => json!({}),
            Some(arguments) => arguments.clone(),
        };

        info!("Calling tool: {}", tool_name);
        let result = self
            .tool_registry
            .execute_tool(tool_name, arguments, &self.context)
            .await?;

        Ok(serde_json::to_value(result)?)
    }
}

fn invalid_params(message: &str) -> MCPError {
    MCPError::Protocol(ProtocolError::InvalidParams(message.to_string()))
}
