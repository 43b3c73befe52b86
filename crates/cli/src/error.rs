//! CLI error types.

use crate::config::ConfigError;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The MCP server could not be reached or refused the handshake.
    ///
    /// Fatal: the process exits and must be restarted.
    #[error("failed to connect to MCP server at {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Configuration file is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
