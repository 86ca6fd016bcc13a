//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Anything that can fail while handling a single join job.
///
/// Every variant is caught at the job boundary and converted into a
/// FAILED status write; none of them terminates the loop.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Queue error: {0}")]
    Queue(#[from] meetbot_queue::QueueError),

    #[error("Store error: {0}")]
    Store(#[from] meetbot_store::StoreError),

    #[error("Browser error: {0}")]
    Browser(#[from] meetbot_browser::BrowserError),

    #[error("Host denied entry to the meeting")]
    AdmissionRejected,

    #[error("Host did not resolve the join request within the wait bound")]
    AdmissionTimeout,
}
