//! Waypoint runtime: model backends, MCP tool sessions and the conversation loop.
//!
//! # Overview
//!
//! The runtime is organized around these concepts:
//!
//! - **Backend**: a trait abstracting LLM providers. [`AnthropicBackend`]
//!   talks to the Anthropic Messages API; [`Guarded`] wraps any backend and
//!   latches it off after an authentication failure.
//! - **ToolHost**: a trait for anything that can list and execute tools.
//!   [`McpToolHost`] is backed by a remote MCP server over Streamable HTTP.
//! - **Agent**: runs one query at a time through the model, executing every
//!   tool call the model asks for until it stops asking.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{Agent, AnthropicAuth, AnthropicBackend, Guarded, McpToolHost};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let auth = AnthropicAuth::ApiKey("sk-ant-api01-...".into());
//! let backend = Guarded::new(AnthropicBackend::builder(auth, "claude-sonnet-4-20250514").build());
//! let tools = McpToolHost::connect("http://localhost:8080/mcp").await?;
//!
//! let agent = Agent::new(backend).with_tools(tools);
//! println!("{}", agent.process_query("What is the time zone for QIM4?").await);
//! # Ok(())
//! # }
//! ```

pub mod conversation;
mod error;
pub mod model;
pub mod providers;
pub mod tools;

#[cfg(test)]
mod testing;

pub use conversation::{Agent, Transcript};
pub use error::{Error, Result};
pub use model::{
    Availability, Backend, Guarded, Message, ModelError, ModelRequest, ModelResponse, Part, Role,
    ToolCall, ToolResult, ToolSpec, Usage,
};
pub use providers::{AnthropicAuth, AnthropicBackend};
pub use tools::{McpToolHost, ToolError, ToolHost, ToolOutput};
