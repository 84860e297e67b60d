//! Transport-level and decoding error types.

use thiserror::Error;

/// Errors raised by a [`ChainNotifierService`](crate::ChainNotifierService)
/// while opening or reading a notification stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection to the node is unavailable or was reset.
    #[error("connection error: {0}")]
    Connection(String),

    /// The node rejected the attached credentials.
    #[error("authentication rejected: {0}")]
    Unauthenticated(String),

    /// Non-OK status returned by the node.
    #[error("RPC status {code}: {message}")]
    Status { code: i32, message: String },

    /// The server ended the stream.
    #[error("stream closed by server")]
    StreamClosed,

    /// Call setup did not complete within the configured duration.
    #[error("call timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The caller's context was cancelled.
    #[error("call cancelled")]
    Cancelled,

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if resubscribing may succeed (transient failure).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::StreamClosed | Self::Timeout { .. }
        )
    }
}

/// A wire payload failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidHashLength(usize),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("malformed transaction: {0}")]
    Transaction(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },

    /// The event carried no variant at all.
    #[error("{0} event empty")]
    EmptyEvent(&'static str),
}
