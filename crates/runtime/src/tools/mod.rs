//! Tool execution and MCP integration.

pub mod errors;
mod host;
mod mcp_client;
mod mcp_host;
mod types;

pub use errors::ToolError;
pub use host::ToolHost;
pub use mcp_client::{CallToolResult, McpClient, McpError, Tool};
pub use mcp_host::McpToolHost;
pub use types::{ToolArguments, ToolOutput};
