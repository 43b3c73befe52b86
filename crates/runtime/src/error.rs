use crate::model::ModelError;
use crate::tools::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not connected to server. Please connect first.")]
    NotConnected,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("tool {name} failed: {source}")]
    ToolCall {
        name: String,
        #[source]
        source: ToolError,
    },

    #[error("listing tools failed: {0}")]
    Catalog(#[from] ToolError),
}

pub type Result<T> = std::result::Result<T, Error>;
