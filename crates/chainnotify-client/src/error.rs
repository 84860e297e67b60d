//! Subscription error taxonomy.

use chainnotify_core::{DecodeError, TransportError};
use thiserror::Error;

/// Why a registration failed or a subscription terminated.
///
/// `Setup` is returned directly from a registration call. The other
/// variants arrive on the subscription itself, at most once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    /// Stream establishment failed; no worker was spawned.
    #[error("subscription setup failed: {0}")]
    Setup(#[source] TransportError),

    /// The stream ended or failed mid-flight.
    #[error("notification stream failed: {0}")]
    Stream(#[source] TransportError),

    /// An event payload failed validation.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The server sent a variant this subscription kind does not expect.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The worker went away without reporting (runtime shutdown).
    #[error("subscription worker exited without a result")]
    WorkerExited,
}

impl NotifierError {
    /// Returns `true` if the failure happened before any worker was spawned.
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::Setup(_))
    }

    /// Returns `true` if resubscribing may succeed.
    ///
    /// Decode and protocol errors point at a version mismatch and will
    /// repeat on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Setup(e) | Self::Stream(e) => e.is_retryable(),
            Self::Decode(_) | Self::Protocol(_) | Self::WorkerExited => false,
        }
    }
}
