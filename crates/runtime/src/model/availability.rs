//! Availability latch for model backends.
//!
//! A backend whose credentials are rejected stays unavailable for the rest of
//! the process. Later calls fail fast without touching the network.

use super::{Backend, ModelError, ModelRequest, ModelResponse};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Whether a backend is known to accept our requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Availability {
    /// No call has completed yet.
    #[default]
    Unknown,
    /// At least one call succeeded.
    Available,
    /// Latched off. Only a restart clears this.
    Unavailable { reason: String },
}

impl Availability {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// A backend wrapper that latches into [`Availability::Unavailable`] on the
/// first authentication failure.
pub struct Guarded<B> {
    inner: Option<B>,
    state: Mutex<Availability>,
}

impl<B: Backend> Guarded<B> {
    /// Wrap a backend. Its state starts as [`Availability::Unknown`].
    pub fn new(inner: B) -> Self {
        Self {
            inner: Some(inner),
            state: Mutex::new(Availability::Unknown),
        }
    }

    /// A guard with no backend behind it, latched from the start.
    ///
    /// Used when credentials are missing at startup so the process can still
    /// run and report the problem on every query.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            inner: None,
            state: Mutex::new(Availability::Unavailable {
                reason: reason.into(),
            }),
        }
    }

    /// Current availability.
    pub fn availability(&self) -> Availability {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, next: Availability) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        // Unavailable is terminal.
        if !state.is_unavailable() {
            *state = next;
        }
    }
}

impl<B: Backend> Backend for Guarded<B> {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        if let Availability::Unavailable { reason } = self.availability() {
            return Err(ModelError::Unavailable(reason));
        }
        let Some(inner) = &self.inner else {
            return Err(ModelError::Unavailable("no model backend configured".into()));
        };

        match inner.call(request).await {
            Ok(response) => {
                self.set(Availability::Available);
                Ok(response)
            }
            Err(ModelError::Auth(message)) => {
                info!(error = %message, "model authentication failed; check credentials and permissions");
                self.set(Availability::Unavailable {
                    reason: format!(
                        "authentication failed ({message}); check your credentials and restart"
                    ),
                });
                Err(ModelError::Auth(message))
            }
            Err(e) => Err(e),
        }
    }
}
