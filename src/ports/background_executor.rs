//! Background executor port.

use futures::future::BoxFuture;

/// Runs work detached from the calling request.
///
/// Spawned futures must outlive client cancellation. Implementations
/// should let the process wait for them on shutdown.
pub trait BackgroundExecutor: Send + Sync {
    /// Spawns `task` and returns immediately. `name` is used for logging.
    fn spawn(&self, name: &'static str, task: BoxFuture<'static, ()>);
}
