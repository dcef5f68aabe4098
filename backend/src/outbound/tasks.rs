//! Tokio-backed [`TaskSpawner`].

use futures_util::future::BoxFuture;

use crate::domain::TraceId;
use crate::domain::ports::TaskSpawner;

/// Spawns detached tasks onto the ambient tokio runtime.
///
/// Each task inherits the caller's [`TraceId`] so its logs correlate with the
/// request that queued it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTaskSpawner;

impl TaskSpawner for TokioTaskSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        drop(tokio::spawn(TraceId::propagate(task)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    #[tokio::test]
    async fn spawned_task_runs_under_callers_trace_id() {
        let trace_id = TraceId::generate();
        let (tx, rx) = tokio::sync::oneshot::channel();

        TraceId::scope(trace_id, async move {
            TokioTaskSpawner.spawn(
                async move {
                    let _ = tx.send(TraceId::current());
                }
                .boxed(),
            );
        })
        .await;

        assert_eq!(rx.await.expect("task ran"), Some(trace_id));
    }
}
