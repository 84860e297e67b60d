//! Subscription workers — one Tokio task per live subscription.
//!
//! A worker owns the server stream, decodes each frame with
//! [`chainnotify_core::transcode`] and forwards the result. Nothing is
//! retried: the first failure is reported once and the worker exits.

use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use chainnotify_core::transcode;
use chainnotify_core::wire::{BlockEpoch, ConfEvent, ConfEventKind, SpendEvent, SpendEventKind};
use chainnotify_core::{DecodeError, EventStream, SpendDetail, TransportError, TxConfirmation};

use crate::error::NotifierError;

/// Pull the next frame; a closed stream counts as a stream error.
async fn next_frame<T>(stream: &mut EventStream<T>) -> Result<T, NotifierError> {
    match stream.next().await {
        Some(Ok(frame)) => Ok(frame),
        Some(Err(e)) => Err(NotifierError::Stream(e)),
        None => Err(NotifierError::Stream(TransportError::StreamClosed)),
    }
}

// ─── Block epochs ─────────────────────────────────────────────────────────────

/// Forward heights until the stream fails, the caller cancels, or the
/// receiver is dropped.
///
/// A height that is ready while the context is already cancelled is dropped,
/// not delivered.
pub(crate) async fn block_epoch_worker(
    mut stream: EventStream<BlockEpoch>,
    cancel: CancellationToken,
    heights: mpsc::Sender<i32>,
    errors: oneshot::Sender<NotifierError>,
) {
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("block epoch subscription cancelled");
                return;
            }
            frame = next_frame(&mut stream) => frame,
        };

        let decoded = frame.and_then(|epoch| {
            transcode::decode_block_epoch(&epoch).map_err(NotifierError::from)
        });
        let height = match decoded {
            Ok(height) => height,
            Err(e) => {
                warn!(error = %e, "block epoch subscription terminated");
                let _ = errors.send(e);
                return;
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(height, "block epoch subscription cancelled, dropping height");
                return;
            }
            sent = heights.send(height) => {
                if sent.is_err() {
                    debug!(height, "block epoch receiver dropped");
                    return;
                }
            }
        }
    }
}

// ─── Confirmations ────────────────────────────────────────────────────────────

pub(crate) async fn confirmation_worker(
    mut stream: EventStream<ConfEvent>,
    result: oneshot::Sender<Result<TxConfirmation, NotifierError>>,
) {
    let outcome = await_confirmation(&mut stream).await;
    match &outcome {
        Ok(conf) => debug!(
            block_height = conf.block_height,
            block_hash = %conf.block_hash,
            tx_index = conf.tx_index,
            "confirmation received"
        ),
        Err(e) => warn!(error = %e, "confirmation subscription terminated"),
    }
    let _ = result.send(outcome);
}

async fn await_confirmation(
    stream: &mut EventStream<ConfEvent>,
) -> Result<TxConfirmation, NotifierError> {
    loop {
        let event = next_frame(stream).await?;
        match event.event {
            Some(ConfEventKind::Conf(details)) => {
                return Ok(transcode::decode_conf_details(&details)?);
            }
            // Reorgs are not surfaced to callers.
            Some(ConfEventKind::Reorg(_)) => {
                debug!("ignoring reorg on confirmation stream");
            }
            None => return Err(DecodeError::EmptyEvent("conf").into()),
            Some(ConfEventKind::Unknown(tag)) => {
                return Err(NotifierError::Protocol(format!(
                    "conf event has unexpected type: {tag}"
                )));
            }
        }
    }
}

// ─── Spends ───────────────────────────────────────────────────────────────────

pub(crate) async fn spend_worker(
    mut stream: EventStream<SpendEvent>,
    result: oneshot::Sender<Result<SpendDetail, NotifierError>>,
) {
    let outcome = await_spend(&mut stream).await;
    match &outcome {
        Ok(spend) => debug!(
            outpoint = %spend.spent_outpoint,
            spender = %spend.spender_tx_hash,
            height = spend.spending_height,
            "spend received"
        ),
        Err(e) => warn!(error = %e, "spend subscription terminated"),
    }
    let _ = result.send(outcome);
}

async fn await_spend(stream: &mut EventStream<SpendEvent>) -> Result<SpendDetail, NotifierError> {
    loop {
        let event = next_frame(stream).await?;
        match event.event {
            Some(SpendEventKind::Spend(details)) => {
                return Ok(transcode::decode_spend_details(&details)?);
            }
            other => debug!(event = ?other, "skipping non-spend event"),
        }
    }
}
