//! Per-call context and macaroon credential attachment.

use std::collections::BTreeMap;
use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::error::DecodeError;

/// Metadata key the node reads the serialized macaroon from.
pub const MACAROON_METADATA_KEY: &str = "macaroon";

/// The context an outgoing streaming call is issued under.
///
/// Carries the caller's cancellation token (transports tie the stream's
/// lifetime to it) and the call metadata sent alongside the request.
#[derive(Debug, Clone)]
pub struct CallContext {
    cancel: CancellationToken,
    metadata: BTreeMap<String, String>,
}

impl CallContext {
    /// A context bound to the given cancellation token.
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            metadata: BTreeMap::new(),
        }
    }

    /// A context that is never cancelled unless [`Self::cancellation`] is
    /// triggered explicitly.
    pub fn background() -> Self {
        Self::new(CancellationToken::new())
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Return a copy of this context with `key` set to `value`.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn metadata_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}

/// A hex-serialized macaroon, ready to be attached to outgoing calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Macaroon(String);

impl Macaroon {
    /// Serialize raw macaroon bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Accept an already hex-encoded macaroon.
    pub fn from_hex(hex_str: &str) -> Result<Self, DecodeError> {
        hex::decode(hex_str).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
        Ok(Self(hex_str.to_ascii_lowercase()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Derive a context for a single outgoing call with this macaroon attached.
    pub fn with_auth(&self, ctx: &CallContext) -> CallContext {
        ctx.clone().with_metadata(MACAROON_METADATA_KEY, self.0.clone())
    }
}

impl fmt::Debug for Macaroon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Macaroon(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_auth_attaches_metadata_and_keeps_cancellation() {
        let token = CancellationToken::new();
        let ctx = CallContext::new(token.clone()).with_metadata("x-request", "1");
        let mac = Macaroon::from_bytes(&[0x02, 0x01, 0xab]);

        let authed = mac.with_auth(&ctx);
        assert_eq!(authed.metadata(MACAROON_METADATA_KEY), Some("0201ab"));
        assert_eq!(authed.metadata("x-request"), Some("1"));
        // Original context is untouched.
        assert_eq!(ctx.metadata(MACAROON_METADATA_KEY), None);

        token.cancel();
        assert!(authed.is_cancelled());
    }

    #[test]
    fn from_hex_validates() {
        assert_eq!(Macaroon::from_hex("0201AB").unwrap().as_hex(), "0201ab");
        assert!(Macaroon::from_hex("not-hex").is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let mac = Macaroon::from_bytes(b"secret");
        assert!(!format!("{mac:?}").contains(&hex::encode(b"secret")));
    }
}
