//! Spawned loader operations with release and cancellation safety.
//!
//! A spawned operation holds only a `Weak` reference to the loader that
//! started it. Completions are delivered only while that loader is alive
//! and the task has not been cancelled; otherwise the in-flight work runs to
//! completion and its result is dropped.

use std::future::Future;
use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to an operation started by one of the `spawn_*` loader methods.
#[derive(Debug)]
pub struct LoadTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl LoadTask {
    /// Spawn `work` on the current tokio runtime, handing it the token that
    /// [`LoadTask::cancel`] trips.
    pub fn spawn<F, Fut>(work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(work(token.clone()));
        Self { token, handle }
    }

    /// Stop caring about the result. Work already in flight is not aborted.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the spawned work has finished, delivered or not.
    pub async fn finished(self) {
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "spawned feed task did not finish cleanly");
        }
    }
}

/// Upgrade `owner` if it is still alive and `token` has not been tripped.
pub fn live_owner<T>(owner: &Weak<T>, token: &CancellationToken) -> Option<Arc<T>> {
    if token.is_cancelled() {
        tracing::debug!("feed task cancelled; dropping result");
        return None;
    }
    let owner = owner.upgrade();
    if owner.is_none() {
        tracing::debug!("feed loader released; dropping result");
    }
    owner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_owner_released() {
        let owner = Arc::new(());
        let weak = Arc::downgrade(&owner);
        let token = CancellationToken::new();
        assert!(live_owner(&weak, &token).is_some());

        drop(owner);
        assert!(live_owner(&weak, &token).is_none());
    }

    #[test]
    fn test_live_owner_cancelled() {
        let owner = Arc::new(());
        let token = CancellationToken::new();
        token.cancel();
        assert!(live_owner(&Arc::downgrade(&owner), &token).is_none());
    }

    #[tokio::test]
    async fn test_cancel_is_observed_by_work() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let (seen_tx, seen_rx) = tokio::sync::oneshot::channel::<bool>();
        let task = LoadTask::spawn(move |token| async move {
            let _ = rx.await;
            let _ = seen_tx.send(token.is_cancelled());
        });

        task.cancel();
        assert!(task.is_cancelled());
        tx.send(()).unwrap();
        task.finished().await;
        assert!(seen_rx.await.unwrap());
    }
}
