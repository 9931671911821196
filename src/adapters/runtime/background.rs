//! Background executor backed by a tokio-util task tracker.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio_util::task::TaskTracker;

use crate::ports::BackgroundExecutor;

/// Spawns detached tasks and lets shutdown wait for them.
#[derive(Debug, Clone, Default)]
pub struct TrackedExecutor {
    tracker: TaskTracker,
}

impl TrackedExecutor {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }

    /// Number of tasks still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Closes the tracker and waits up to `grace` for running tasks.
    /// Returns false when the grace period ran out.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(pending, "waiting for background tasks");
        }
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    pending = self.tracker.len(),
                    grace_secs = grace.as_secs(),
                    "background tasks still running after grace period"
                );
                false
            }
        }
    }
}

impl BackgroundExecutor for TrackedExecutor {
    fn spawn(&self, name: &'static str, task: BoxFuture<'static, ()>) {
        tracing::debug!(task = name, "spawning background task");
        self.tracker.spawn(async move {
            task.await;
            tracing::debug!(task = name, "background task finished");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn shutdown_waits_for_spawned_tasks() {
        let executor = TrackedExecutor::new();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let done = done.clone();
            executor.spawn(
                "count",
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        assert!(executor.shutdown(Duration::from_secs(5)).await);
        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert_eq!(executor.pending(), 0);
    }

    #[tokio::test]
    async fn shutdown_gives_up_after_grace_period() {
        let executor = TrackedExecutor::new();
        executor.spawn(
            "stuck",
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }),
        );

        assert!(!executor.shutdown(Duration::from_millis(20)).await);
        assert_eq!(executor.pending(), 1);
    }
}
