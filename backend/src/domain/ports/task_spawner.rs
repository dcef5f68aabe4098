//! Port for running detached background work.

use futures_util::future::BoxFuture;

/// Runs fire-and-forget tasks outside the caller's request.
///
/// Spawned work must not be cancelled when the originating request ends, and
/// its outcome never reaches the caller.
#[cfg_attr(test, mockall::automock)]
pub trait TaskSpawner: Send + Sync {
    /// Schedule `task` to run to completion in the background.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}
