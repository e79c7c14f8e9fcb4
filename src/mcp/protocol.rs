use crate::mcp::errors::{JsonRpcError, MCPError, MCPResult, ProtocolError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 message structure for MCP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCPMessage {
    #[serde(default)]
    pub jsonrpc: String,
    /// `Some(Value::Null)` for an explicit `"id": null`, `None` when absent
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// Request message structure
#[derive(Debug, Clone, PartialEq)]
pub struct MCPRequest {
    pub id: Value,
    pub method: String,
    pub params: Option<Value>,
}

/// Notification message structure (no id, no response expected)
#[derive(Debug, Clone, PartialEq)]
pub struct MCPNotification {
    pub method: String,
    pub params: Option<Value>,
}

impl MCPMessage {
    const JSONRPC_VERSION: &'static str = "2.0";

    /// Create a new response message
    pub fn response(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: Self::JSONRPC_VERSION.to_string(),
            id: Some(id),
            method: None,
            params: None,
            result: Some(result),
            error: None,
        }
    }

    /// Create a new error response message.
    ///
    /// `id` is `Value::Null` when the request id could not be read.
    pub fn error_response(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: Self::JSONRPC_VERSION.to_string(),
            id: Some(id),
            method: None,
            params: None,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_request(&self) -> bool {
        self.method.is_some() && self.id.is_some()
    }

    pub fn is_response(&self) -> bool {
        self.id.is_some()
            && self.method.is_none()
            && (self.result.is_some() || self.error.is_some())
    }

    pub fn is_notification(&self) -> bool {
        self.method.is_some() && self.id.is_none()
    }

    /// Validate the message structure
    pub fn validate(&self) -> MCPResult<()> {
        if self.jsonrpc != Self::JSONRPC_VERSION {
            return Err(invalid(format!(
                "Invalid JSON-RPC version: {:?}",
                self.jsonrpc
            )));
        }

        if self.is_request() || self.is_notification() {
            if self.result.is_some() || self.error.is_some() {
                return Err(invalid(
                    "Request message cannot have result or error fields".to_string(),
                ));
            }
        } else if self.is_response() {
            if self.result.is_some() && self.error.is_some() {
                return Err(invalid(
                    "Response cannot have both result and error".to_string(),
                ));
            }
        } else {
            return Err(invalid(
                "Message does not match any valid type (request, response, notification)"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Convert to typed request
    pub fn as_request(&self) -> MCPResult<MCPRequest> {
        match (&self.id, &self.method) {
            (Some(id), Some(method)) => Ok(MCPRequest {
                id: id.clone(),
                method: method.clone(),
                params: self.params.clone(),
            }),
            _ => Err(invalid("Message is not a request".to_string())),
        }
    }

    /// Convert to typed notification
    pub fn as_notification(&self) -> MCPResult<MCPNotification> {
        match (&self.id, &self.method) {
            (None, Some(method)) => Ok(MCPNotification {
                method: method.clone(),
                params: self.params.clone(),
            }),
            _ => Err(invalid("Message is not a notification".to_string())),
        }
    }
}

fn invalid(message: String) -> MCPError {
    MCPError::Protocol(ProtocolError::InvalidMessage(message))
}

/// Server capabilities advertised on `initialize`; both are no-op flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
    pub logging: LoggingCapability,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingCapability {}

/// Server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Client information sent with `initialize`, only used for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Initialize response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Protocol message parser
pub struct MessageParser;

impl MessageParser {
    /// Parse a message from JSON bytes.
    ///
    /// Only syntax is checked here; structural validation is left to the
    /// dispatcher so it can still answer with the request id.
    pub fn parse_message(data: &[u8]) -> MCPResult<MCPMessage> {
        serde_json::from_slice(data)
            .map_err(|e| MCPError::Protocol(ProtocolError::ParseError(e.to_string())))
    }

    /// Serialize a message to JSON bytes
    pub fn serialize_message(message: &MCPMessage) -> MCPResult<Vec<u8>> {
        Ok(serde_json::to_vec(message)?)
    }
}
