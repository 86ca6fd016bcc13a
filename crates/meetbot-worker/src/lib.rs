//! Meeting join worker.
//!
//! This crate provides:
//! - The queue-consumption loop with per-job failure isolation
//! - The per-job join state machine (JOINING -> IN_PROGRESS / FAILED)
//! - Cooperative, signal-driven shutdown

pub mod config;
pub mod error;
pub mod executor;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::{ShutdownHandle, Worker};
