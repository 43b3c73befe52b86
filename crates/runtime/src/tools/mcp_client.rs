//! MCP (Model Context Protocol) client over Streamable HTTP.
//!
//! This module connects to a remote MCP server using the official rmcp SDK.
//!
//! # Example
//!
//! ```ignore
//! use runtime::tools::McpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let client = McpClient::connect("http://localhost:8080/mcp").await?;
//!
//! let tools = client.list_tools().await?;
//! for tool in &tools {
//!     println!("Tool: {}", tool.name);
//! }
//! client.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub use rmcp::model::{CallToolResult, Tool};

use rmcp::{
    ServiceExt,
    model::CallToolRequestParams,
    service::{RoleClient, RunningService},
    transport::StreamableHttpClientTransport,
};
use tracing::{debug, info};

/// Error type for MCP operations.
pub type McpError = Box<dyn std::error::Error + Send + Sync>;

/// An MCP client holding one live session with a remote server.
pub struct McpClient {
    url: String,
    service: RunningService<RoleClient, ()>,
}

impl McpClient {
    /// Connect to the server at `url` and complete the MCP handshake.
    pub async fn connect(url: impl Into<String>) -> Result<Self, McpError> {
        let url = url.into();
        info!(%url, "connecting to MCP server");

        let transport = StreamableHttpClientTransport::from_uri(url.clone());
        let service = ().serve(transport).await?;

        let client = Self { url, service };
        info!(url = %client.url, server = client.peer_name().unwrap_or("unknown"), "MCP session initialized");
        Ok(client)
    }

    /// Name the server reported during the handshake.
    pub fn peer_name(&self) -> Option<&str> {
        self.service
            .peer_info()
            .map(|info| info.server_info.name.as_str())
    }

    /// The endpoint this client is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// List available tools from the server.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        let response = self.service.list_tools(Default::default()).await?;
        Ok(response.tools)
    }

    /// Call a tool with the given name and arguments.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, McpError> {
        let params = CallToolRequestParams {
            name: name.into().into(),
            arguments,
            meta: None,
            task: None,
        };

        debug!(tool = %params.name, "calling MCP tool");
        let result = self.service.call_tool(params).await?;
        Ok(result)
    }

    /// Close the session and stop the transport.
    pub async fn shutdown(self) -> Result<(), McpError> {
        let reason = self.service.cancel().await?;
        info!(url = %self.url, ?reason, "MCP session closed");
        Ok(())
    }
}
