//! Consumer-side queue abstraction.

use async_trait::async_trait;

use crate::error::QueueResult;
use crate::job::JoinJob;
use crate::queue::JobQueue;

/// Source of join jobs for a worker loop.
///
/// The worker depends on this trait rather than on Redis directly so
/// the loop can be driven by an in-memory fake in tests.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Non-blocking pop of the next job, `None` when the queue is empty.
    async fn pop(&self) -> QueueResult<Option<JoinJob>>;
}

#[async_trait]
impl<T: JobSource + ?Sized> JobSource for std::sync::Arc<T> {
    async fn pop(&self) -> QueueResult<Option<JoinJob>> {
        (**self).pop().await
    }
}

#[async_trait]
impl JobSource for JobQueue {
    async fn pop(&self) -> QueueResult<Option<JoinJob>> {
        JobQueue::pop(self).await
    }
}
