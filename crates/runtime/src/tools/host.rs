//! Tool host trait.

use super::{ToolError, ToolOutput};
use crate::model::{ToolCall, ToolSpec};
use std::future::Future;

/// Trait for tool execution hosts.
///
/// Implementations enumerate the tools they offer and execute tool calls.
/// This is the boundary between the conversation loop and side effects.
pub trait ToolHost: Send + Sync {
    /// Fetch the current tool catalog.
    fn list_tools(&self) -> impl Future<Output = Result<Vec<ToolSpec>, ToolError>> + Send;

    /// Execute a tool call.
    fn call_tool(
        &self,
        call: &ToolCall,
    ) -> impl Future<Output = Result<ToolOutput, ToolError>> + Send;
}
