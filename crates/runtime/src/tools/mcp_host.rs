//! MCP-backed tool host.

use super::{McpClient, McpError, ToolArguments, ToolError, ToolHost, ToolOutput};
use crate::model::{ToolCall, ToolSpec};

/// Tool host backed by a remote MCP server.
pub struct McpToolHost {
    client: McpClient,
}

impl McpToolHost {
    /// Connect to the MCP server at `url`.
    pub async fn connect(url: impl Into<String>) -> Result<Self, McpError> {
        let client = McpClient::connect(url).await?;
        Ok(Self { client })
    }

    /// The endpoint this host is connected to.
    pub fn url(&self) -> &str {
        self.client.url()
    }

    /// Close the underlying MCP session.
    pub async fn shutdown(self) -> Result<(), McpError> {
        self.client.shutdown().await
    }
}

impl ToolHost for McpToolHost {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError> {
        let tools = self
            .client
            .list_tools()
            .await
            .map_err(|e| ToolError::Connection(e.to_string()))?;
        Ok(tools.into_iter().map(ToolSpec::from).collect())
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let arguments = ToolArguments::try_from(call.input.clone())?;
        let result = self
            .client
            .call_tool(&call.name, arguments.0)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        Ok(ToolOutput::from(result))
    }
}
