use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while listing or executing tools.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[non_exhaustive]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("connection: {0}")]
    Connection(String),
    #[error("execution failed: {0}")]
    Execution(String),
}
