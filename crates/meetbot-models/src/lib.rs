//! Shared data models for the MeetBot backend.
//!
//! This crate provides Serde-serializable types for:
//! - Meeting identifiers
//! - Meeting lifecycle status and user-facing display messages

pub mod meeting;

// Re-export common types
pub use meeting::{MeetingId, MeetingStatus};
