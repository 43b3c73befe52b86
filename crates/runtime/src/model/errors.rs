use thiserror::Error;

/// Errors from LLM provider calls.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A network error occurred during the API call.
    #[error("network: {0}")]
    Network(String),

    /// The LLM provider returned an error response.
    #[error("provider api ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider rejected our credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend is latched unavailable and was not contacted.
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The provider response could not be parsed.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Whether this error means the credentials are bad.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
