//! Caller-facing subscription handles.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{FutureExt, Stream, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::error::NotifierError;

/// The result of a single-shot subscription (confirmation or spend).
///
/// Resolves exactly once: with the decoded notification, or with the error
/// that terminated the worker. Dropping the handle abandons the result; the
/// worker still exits on its own once the stream yields a terminal event.
#[derive(Debug)]
pub struct SingleShot<T> {
    rx: oneshot::Receiver<Result<T, NotifierError>>,
}

impl<T> SingleShot<T> {
    pub(crate) fn channel() -> (oneshot::Sender<Result<T, NotifierError>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Non-blocking check. `None` while the worker is still waiting.
    pub fn try_result(&mut self) -> Option<Result<T, NotifierError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(NotifierError::WorkerExited)),
        }
    }
}

impl<T> Future for SingleShot<T> {
    type Output = Result<T, NotifierError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx
            .poll_unpin(cx)
            .map(|received| received.unwrap_or(Err(NotifierError::WorkerExited)))
    }
}

/// Block heights, one per new best-chain block.
///
/// Yields `Ok(height)` in stream order. When the worker stops it yields the
/// terminal error (if there was one) and then `None`.
///
/// Cancelling the registration context ends the sequence without an error,
/// including while the subscription is idle waiting for the next block.
/// Heights not yet taken when the context is cancelled are dropped.
#[derive(Debug)]
pub struct BlockEpochStream {
    heights: mpsc::Receiver<i32>,
    error: Option<oneshot::Receiver<NotifierError>>,
    cancel: CancellationToken,
}

impl BlockEpochStream {
    pub(crate) fn new(
        heights: mpsc::Receiver<i32>,
        error: oneshot::Receiver<NotifierError>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            heights,
            error: Some(error),
            cancel,
        }
    }

    /// Receive the next height or the terminal error.
    pub async fn recv(&mut self) -> Option<Result<i32, NotifierError>> {
        self.next().await
    }

    /// Split into the raw output and error channels.
    ///
    /// The error receiver resolves with `Err(RecvError)` if the worker exited
    /// without an error (cancellation). Heights already buffered in the raw
    /// receiver are not filtered on cancellation.
    pub fn into_channels(self) -> (mpsc::Receiver<i32>, Option<oneshot::Receiver<NotifierError>>) {
        (self.heights, self.error)
    }
}

impl Stream for BlockEpochStream {
    type Item = Result<i32, NotifierError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.cancel.is_cancelled() {
            // A buffered height was never taken by the caller; drop it.
            this.heights.close();
            while this.heights.try_recv().is_ok() {}
        } else {
            match this.heights.poll_recv(cx) {
                Poll::Ready(Some(height)) => return Poll::Ready(Some(Ok(height))),
                Poll::Pending => return Poll::Pending,
                // Worker has exited; anything it reported is already in `error`.
                Poll::Ready(None) => {}
            }
        }

        let Some(error) = this.error.as_mut() else {
            return Poll::Ready(None);
        };
        match error.poll_unpin(cx) {
            Poll::Ready(received) => {
                this.error = None;
                Poll::Ready(received.ok().map(Err))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainnotify_core::TransportError;

    #[tokio::test]
    async fn single_shot_resolves_once() {
        let (tx, mut handle) = SingleShot::<u32>::channel();
        assert!(handle.try_result().is_none());
        tx.send(Ok(7)).unwrap();
        assert_eq!(handle.await, Ok(7));
    }

    #[tokio::test]
    async fn single_shot_dropped_sender() {
        let (tx, handle) = SingleShot::<u32>::channel();
        drop(tx);
        assert_eq!(handle.await, Err(NotifierError::WorkerExited));
    }

    #[tokio::test]
    async fn epoch_stream_yields_heights_then_error_then_end() {
        let (h_tx, h_rx) = mpsc::channel(1);
        let (e_tx, e_rx) = oneshot::channel();
        let mut stream = BlockEpochStream::new(h_rx, e_rx, CancellationToken::new());

        tokio::spawn(async move {
            h_tx.send(1).await.unwrap();
            h_tx.send(2).await.unwrap();
            let _ = e_tx.send(NotifierError::Stream(TransportError::StreamClosed));
        });

        assert_eq!(stream.recv().await, Some(Ok(1)));
        assert_eq!(stream.recv().await, Some(Ok(2)));
        assert_eq!(
            stream.recv().await,
            Some(Err(NotifierError::Stream(TransportError::StreamClosed)))
        );
        assert_eq!(stream.recv().await, None);
    }

    #[tokio::test]
    async fn epoch_stream_ends_quietly_without_error() {
        let (h_tx, h_rx) = mpsc::channel::<i32>(1);
        let (e_tx, e_rx) = oneshot::channel::<NotifierError>();
        let mut stream = BlockEpochStream::new(h_rx, e_rx, CancellationToken::new());
        drop(h_tx);
        drop(e_tx);
        assert_eq!(stream.recv().await, None);
    }

    #[tokio::test]
    async fn epoch_stream_drops_buffered_height_after_cancel() {
        let (h_tx, h_rx) = mpsc::channel(1);
        let (e_tx, e_rx) = oneshot::channel::<NotifierError>();
        let cancel = CancellationToken::new();
        let mut stream = BlockEpochStream::new(h_rx, e_rx, cancel.clone());

        h_tx.send(42).await.unwrap();
        cancel.cancel();
        drop(e_tx);

        assert_eq!(stream.recv().await, None);
        // The sender observes the closed channel.
        assert!(h_tx.send(43).await.is_err());
    }

    #[tokio::test]
    async fn epoch_stream_keeps_terminal_error_after_cancel() {
        let (h_tx, h_rx) = mpsc::channel(1);
        let (e_tx, e_rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        let mut stream = BlockEpochStream::new(h_rx, e_rx, cancel.clone());

        h_tx.send(9).await.unwrap();
        e_tx.send(NotifierError::Stream(TransportError::StreamClosed)).unwrap();
        cancel.cancel();

        assert_eq!(
            stream.recv().await,
            Some(Err(NotifierError::Stream(TransportError::StreamClosed)))
        );
        assert_eq!(stream.recv().await, None);
    }
}
