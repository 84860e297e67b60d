//! The `ChainNotifierService` trait — the streaming transport seam.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::auth::CallContext;
use crate::error::TransportError;
use crate::wire::{BlockEpoch, ConfEvent, ConfRequest, SpendEvent, SpendRequest};

/// A server stream of framed events.
///
/// `None` means the server ended the stream; `Some(Err(_))` is a
/// transport-level failure mid-flight.
pub type EventStream<T> = Pin<Box<dyn Stream<Item = Result<T, TransportError>> + Send>>;

/// The node's chain notifier service, as seen over an established connection.
///
/// Each call opens one server stream. Implementations must end the stream
/// once the context's cancellation token fires.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn ChainNotifierService>`.
#[async_trait]
pub trait ChainNotifierService: Send + Sync + 'static {
    /// Stream one [`BlockEpoch`] per new best-chain block.
    async fn register_block_epoch_ntfn(
        &self,
        ctx: CallContext,
        req: BlockEpoch,
    ) -> Result<EventStream<BlockEpoch>, TransportError>;

    /// Stream confirmation (and reorg) events for a txid or script.
    async fn register_confirmations_ntfn(
        &self,
        ctx: CallContext,
        req: ConfRequest,
    ) -> Result<EventStream<ConfEvent>, TransportError>;

    /// Stream spend (and reorg) events for an outpoint or script.
    async fn register_spend_ntfn(
        &self,
        ctx: CallContext,
        req: SpendRequest,
    ) -> Result<EventStream<SpendEvent>, TransportError>;
}
