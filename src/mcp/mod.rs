//! Model Context Protocol (MCP) server for the Jira bridge.
//!
//! JSON-RPC dispatch lives in `server`, the eight Jira tools in `tools`,
//! and `transport` carries messages over stdin/stdout. The HTTP endpoint
//! hands request bodies straight to `MCPServer::handle_raw`.

pub mod errors;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

// Re-export core types for easier access
pub use self::{server::MCPServer, tools::MCPTool, transport::MCPTransport};

/// MCP Protocol version implemented by this server
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server information
pub const SERVER_NAME: &str = "jira-bridge";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
