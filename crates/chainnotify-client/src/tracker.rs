//! Worker tracking for coordinated shutdown.
//!
//! Every subscription worker is spawned through a [`WorkerTracker`]. The
//! tracker counts a worker from the moment it is spawned until its future
//! completes or is dropped, so every exit path (including early returns on
//! decode failure) releases it.

use std::future::Future;

use tokio_util::task::TaskTracker;

/// Join-all handle over every worker spawned by a client.
#[derive(Debug, Clone, Default)]
pub struct WorkerTracker {
    tasks: TaskTracker,
}

impl WorkerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a worker onto the current Tokio runtime and track it.
    pub fn spawn<F>(&self, kind: &'static str, worker: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(worker);
        tracing::trace!(kind, active = self.tasks.len(), "worker spawned");
    }

    /// Number of workers that have not exited yet.
    pub fn active(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every worker spawned so far has exited.
    ///
    /// The tracker is reopened afterwards, also when the wait is abandoned
    /// part-way (for example under a timeout).
    pub async fn wait(&self) {
        self.tasks.close();
        let _reopen = Reopen(&self.tasks);
        self.tasks.wait().await;
    }
}

struct Reopen<'a>(&'a TaskTracker);

impl Drop for Reopen<'_> {
    fn drop(&mut self) {
        self.0.reopen();
    }
}
