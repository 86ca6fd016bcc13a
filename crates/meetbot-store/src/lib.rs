//! Firestore-backed meeting status store.
//!
//! The worker only ever writes the `status` field of a meeting
//! document; reads and the richer meeting schema belong to the API
//! side. The `StatusStore` trait keeps the worker testable without a
//! live Firestore project.

pub mod client;
pub mod error;
pub mod meetings;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{StoreError, StoreResult};
pub use meetings::{FirestoreMeetingStore, StatusStore};
