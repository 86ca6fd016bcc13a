//! Redis-backed join job queue.
//!
//! This crate provides:
//! - The `JoinJob` wire type consumed by the worker
//! - Producer-side enqueueing onto a Redis list
//! - Non-blocking consumer-side dequeueing (`JobSource`)

pub mod error;
pub mod job;
pub mod queue;
pub mod source;

pub use error::{QueueError, QueueResult};
pub use job::JoinJob;
pub use queue::{JobQueue, QueueConfig};
pub use source::JobSource;
