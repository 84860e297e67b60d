//! The `ChainNotifier` trait — the public subscription surface.

use async_trait::async_trait;

use chainnotify_core::{CallContext, ChainHash, Outpoint, SpendDetail, TxConfirmation};

use crate::error::NotifierError;
use crate::subscription::{BlockEpochStream, SingleShot};

/// Block, confirmation and spend notifications from a chain backend.
///
/// Every registration either fails synchronously with
/// [`NotifierError::Setup`] (no worker is started) or returns a live
/// subscription handle.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn ChainNotifier>`.
#[async_trait]
pub trait ChainNotifier: Send + Sync {
    /// Subscribe to new best-chain heights.
    ///
    /// The subscription lives until the stream fails or `ctx` is cancelled.
    async fn register_block_epoch_ntfn(
        &self,
        ctx: &CallContext,
    ) -> Result<BlockEpochStream, NotifierError>;

    /// Wait for `txid` (or, when `None`, any transaction paying to
    /// `pk_script`) to reach `num_confs` confirmations.
    async fn register_confirmations_ntfn(
        &self,
        ctx: &CallContext,
        txid: Option<&ChainHash>,
        pk_script: &[u8],
        num_confs: u32,
        height_hint: u32,
    ) -> Result<SingleShot<TxConfirmation>, NotifierError>;

    /// Wait for `outpoint` (or, when `None`, any output with `pk_script`)
    /// to be spent.
    async fn register_spend_ntfn(
        &self,
        ctx: &CallContext,
        outpoint: Option<&Outpoint>,
        pk_script: &[u8],
        height_hint: u32,
    ) -> Result<SingleShot<SpendDetail>, NotifierError>;

    /// Block until every subscription worker started so far has exited.
    async fn wait_for_finished(&self);
}
