//! Chain notifier client: opens authenticated streams and spawns workers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use chainnotify_core::transcode;
use chainnotify_core::wire::{BlockEpoch, ConfRequest, SpendRequest};
use chainnotify_core::{
    CallContext, ChainHash, ChainNotifierService, EventStream, Macaroon, Outpoint, SpendDetail,
    TransportError, TxConfirmation,
};

use crate::config::{duration_ms, NotifierConfig};
use crate::error::NotifierError;
use crate::notifier::ChainNotifier;
use crate::subscription::{BlockEpochStream, SingleShot};
use crate::tracker::WorkerTracker;
use crate::worker;

/// [`ChainNotifier`] over a node's streaming notifier service.
///
/// Each registration attaches the macaroon to a fresh call context, opens
/// one server stream (bounded by the configured RPC timeout) and spawns a
/// tracked worker that owns the stream from then on.
pub struct ChainNotifierClient {
    service: Arc<dyn ChainNotifierService>,
    macaroon: Macaroon,
    timeout: Duration,
    workers: WorkerTracker,
}

impl ChainNotifierClient {
    pub fn new(
        service: Arc<dyn ChainNotifierService>,
        macaroon: Macaroon,
        config: &NotifierConfig,
    ) -> Self {
        Self::with_timeout(service, macaroon, config.rpc_timeout())
    }

    pub fn with_timeout(
        service: Arc<dyn ChainNotifierService>,
        macaroon: Macaroon,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            macaroon,
            timeout,
            workers: WorkerTracker::new(),
        }
    }

    /// Number of subscription workers still running.
    pub fn active_workers(&self) -> usize {
        self.workers.active()
    }

    /// Await stream establishment, racing the caller's cancellation and the
    /// setup timeout.
    async fn establish<T, F>(
        &self,
        ctx: &CallContext,
        kind: &'static str,
        call: F,
    ) -> Result<EventStream<T>, NotifierError>
    where
        F: Future<Output = Result<EventStream<T>, TransportError>> + Send,
    {
        let timeout = self.timeout;
        let opened = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => Err(TransportError::Cancelled),
            res = tokio::time::timeout(timeout, call) => match res {
                Ok(opened) => opened,
                Err(_) => Err(TransportError::Timeout {
                    ms: duration_ms(timeout),
                }),
            },
        };

        opened.map_err(|e| {
            warn!(kind, error = %e, "failed to open notification stream");
            NotifierError::Setup(e)
        })
    }
}

#[async_trait]
impl ChainNotifier for ChainNotifierClient {
    async fn register_block_epoch_ntfn(
        &self,
        ctx: &CallContext,
    ) -> Result<BlockEpochStream, NotifierError> {
        let call = self
            .service
            .register_block_epoch_ntfn(self.macaroon.with_auth(ctx), BlockEpoch::default());
        let stream = self.establish(ctx, "block_epoch", call).await?;

        let (heights_tx, heights_rx) = mpsc::channel(1);
        let (error_tx, error_rx) = oneshot::channel();
        self.workers.spawn(
            "block_epoch",
            worker::block_epoch_worker(stream, ctx.cancellation().clone(), heights_tx, error_tx),
        );

        info!("registered block epoch notification");
        Ok(BlockEpochStream::new(
            heights_rx,
            error_rx,
            ctx.cancellation().clone(),
        ))
    }

    async fn register_confirmations_ntfn(
        &self,
        ctx: &CallContext,
        txid: Option<&ChainHash>,
        pk_script: &[u8],
        num_confs: u32,
        height_hint: u32,
    ) -> Result<SingleShot<TxConfirmation>, NotifierError> {
        let req = ConfRequest {
            txid: txid.map(transcode::encode_hash).unwrap_or_default(),
            script: pk_script.to_vec(),
            num_confs,
            height_hint,
        };
        let call = self
            .service
            .register_confirmations_ntfn(self.macaroon.with_auth(ctx), req);
        let stream = self.establish(ctx, "confirmation", call).await?;

        let (result_tx, handle) = SingleShot::channel();
        self.workers
            .spawn("confirmation", worker::confirmation_worker(stream, result_tx));

        info!(?txid, num_confs, height_hint, "registered confirmation notification");
        Ok(handle)
    }

    async fn register_spend_ntfn(
        &self,
        ctx: &CallContext,
        outpoint: Option<&Outpoint>,
        pk_script: &[u8],
        height_hint: u32,
    ) -> Result<SingleShot<SpendDetail>, NotifierError> {
        let req = SpendRequest {
            outpoint: outpoint.map(transcode::encode_outpoint),
            script: pk_script.to_vec(),
            height_hint,
        };
        let call = self
            .service
            .register_spend_ntfn(self.macaroon.with_auth(ctx), req);
        let stream = self.establish(ctx, "spend", call).await?;

        let (result_tx, handle) = SingleShot::channel();
        self.workers.spawn("spend", worker::spend_worker(stream, result_tx));

        info!(?outpoint, height_hint, "registered spend notification");
        Ok(handle)
    }

    async fn wait_for_finished(&self) {
        self.workers.wait().await;
    }
}
