use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::JiraError;

/// Error handling for the MCP dispatcher and its transports
pub type MCPResult<T> = Result<T, MCPError>;

/// Main error type for all MCP operations
#[derive(Debug, thiserror::Error)]
pub enum MCPError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Tool execution error: {0}")]
    ToolExecution(#[from] ToolError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Transport layer errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Protocol-level errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Invalid request: {0}")]
    InvalidMessage(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Tool execution errors
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Service(#[from] JiraError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Standard JSON-RPC 2.0 error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
}

/// JSON-RPC error response structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: JsonRpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    fn internal(message: impl std::fmt::Display) -> Self {
        JsonRpcError::new(
            JsonRpcErrorCode::InternalError,
            format!("Internal error: {}", message),
        )
    }
}

impl From<MCPError> for JsonRpcError {
    fn from(error: MCPError) -> Self {
        match error {
            MCPError::Protocol(error) => error.into(),
            MCPError::ToolExecution(error) => error.into(),
            MCPError::Validation(msg) => JsonRpcError::new(JsonRpcErrorCode::InvalidParams, msg),
            MCPError::Transport(error) => JsonRpcError::internal(error),
            MCPError::Serialization(error) => JsonRpcError::internal(error),
        }
    }
}

impl From<ProtocolError> for JsonRpcError {
    fn from(error: ProtocolError) -> Self {
        let code = match &error {
            ProtocolError::InvalidMessage(_) => JsonRpcErrorCode::InvalidRequest,
            ProtocolError::MethodNotFound(_) => JsonRpcErrorCode::MethodNotFound,
            ProtocolError::InvalidParams(_) => JsonRpcErrorCode::InvalidParams,
            ProtocolError::ParseError(_) => JsonRpcErrorCode::ParseError,
        };
        JsonRpcError::new(code, error.to_string())
    }
}

impl From<ToolError> for JsonRpcError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::NotFound(_) => {
                JsonRpcError::new(JsonRpcErrorCode::MethodNotFound, error.to_string())
            }
            ToolError::InvalidParams(_) => {
                JsonRpcError::new(JsonRpcErrorCode::InvalidParams, error.to_string())
            }
            ToolError::Service(error) => error.into(),
            ToolError::Serialization(error) => JsonRpcError::internal(error),
        }
    }
}

impl From<JiraError> for JsonRpcError {
    fn from(error: JiraError) -> Self {
        if !error.is_client_error() {
            return JsonRpcError::internal(error);
        }

        let message = error.to_string();
        match error {
            JiraError::TransitionNotFound {
                available_statuses,
                available_transitions,
                ..
            } => JsonRpcError::new(JsonRpcErrorCode::InvalidParams, message).with_data(json!({
                "available_statuses": available_statuses,
                "available_transitions": available_transitions,
            })),
            _ => JsonRpcError::new(JsonRpcErrorCode::InvalidParams, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_maps_to_method_not_found() {
        let error: JsonRpcError = MCPError::from(ToolError::NotFound("frobnicate".into())).into();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Unknown tool: frobnicate");
        assert_eq!(error.data, None);
    }

    #[test]
    fn test_method_not_found_message() {
        let error: JsonRpcError = ProtocolError::MethodNotFound("resources/list".into()).into();
        assert_eq!(error.code, JsonRpcErrorCode::MethodNotFound as i32);
        assert_eq!(error.message, "Method not found: resources/list");
    }

    #[test]
    fn test_missing_argument_is_invalid_params() {
        let error: JsonRpcError = ToolError::from(JiraError::MissingArgument("ticket_key")).into();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "ticket_key is required");
    }

    #[test]
    fn test_transition_not_found_carries_choices() {
        let error: JsonRpcError = JiraError::TransitionNotFound {
            ticket_key: "PROJ-1".into(),
            status: "Done".into(),
            available_statuses: vec!["In Progress".into()],
            available_transitions: vec!["Start Progress".into()],
        }
        .into();

        assert_eq!(error.code, -32602);
        assert_eq!(
            error.data,
            Some(json!({
                "available_statuses": ["In Progress"],
                "available_transitions": ["Start Progress"]
            }))
        );
    }

    #[test]
    fn test_upstream_failure_is_internal_error() {
        let error: JsonRpcError = JiraError::Upstream {
            status: 503,
            message: "Service Unavailable".into(),
        }
        .into();
        assert_eq!(error.code, -32603);
        assert_eq!(
            error.message,
            "Internal error: Jira API error (503): Service Unavailable"
        );
    }

    #[test]
    fn test_error_serialization_skips_empty_data() {
        let error = JsonRpcError::new(JsonRpcErrorCode::ParseError, "Parse error: eof");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"code": -32700, "message": "Parse error: eof"})
        );
    }
}
