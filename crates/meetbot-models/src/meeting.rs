//! Meeting identity and lifecycle status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque meeting identifier, assigned by the producer side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(String);

impl MeetingId {
    /// Create a meeting ID from an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MeetingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MeetingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Meeting lifecycle status.
///
/// The worker only ever writes `Joining`, `InProgress` and `Failed`;
/// `Processing` and `Completed` belong to the downstream transcript
/// pipeline. Progression is monotone along the success path
/// PENDING -> JOINING -> IN_PROGRESS, and `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    /// Meeting is queued, the bot has not picked it up yet
    #[default]
    Pending,
    /// The bot is navigating to the meeting and asking to join
    Joining,
    /// The bot was admitted and is inside the meeting
    InProgress,
    /// Meeting ended, recording is being processed downstream
    Processing,
    /// Processing finished, summary available
    Completed,
    /// Joining or processing failed
    Failed,
}

impl MeetingStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Pending => "PENDING",
            MeetingStatus::Joining => "JOINING",
            MeetingStatus::InProgress => "IN_PROGRESS",
            MeetingStatus::Processing => "PROCESSING",
            MeetingStatus::Completed => "COMPLETED",
            MeetingStatus::Failed => "FAILED",
        }
    }

    /// User-facing description shown while the meeting is in this state.
    pub fn display_message(&self) -> &'static str {
        match self {
            MeetingStatus::Pending => "Bot will join soon",
            MeetingStatus::Joining => "Bot is joining",
            MeetingStatus::InProgress => "Meeting in progress",
            MeetingStatus::Processing => "Meeting currently being processed",
            MeetingStatus::Completed => "Meeting completed",
            MeetingStatus::Failed => "Failed processing meeting",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, MeetingStatus::Completed | MeetingStatus::Failed)
    }

    /// Check if the join worker is allowed to write this status.
    ///
    /// `Processing` and `Completed` are owned by the downstream pipeline.
    pub fn is_worker_writable(&self) -> bool {
        matches!(
            self,
            MeetingStatus::Joining | MeetingStatus::InProgress | MeetingStatus::Failed
        )
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_format_is_screaming_snake_case() {
        let json = serde_json::to_string(&MeetingStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");

        let decoded: MeetingStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(decoded, MeetingStatus::Failed);
    }

    #[test]
    fn worker_writes_only_its_own_states() {
        assert!(MeetingStatus::Joining.is_worker_writable());
        assert!(MeetingStatus::InProgress.is_worker_writable());
        assert!(MeetingStatus::Failed.is_worker_writable());

        assert!(!MeetingStatus::Pending.is_worker_writable());
        assert!(!MeetingStatus::Processing.is_worker_writable());
        assert!(!MeetingStatus::Completed.is_worker_writable());
    }

    #[test]
    fn terminal_states() {
        assert!(MeetingStatus::Failed.is_terminal());
        assert!(MeetingStatus::Completed.is_terminal());
        assert!(!MeetingStatus::InProgress.is_terminal());
        assert!(!MeetingStatus::Joining.is_terminal());
    }

    #[test]
    fn meeting_id_is_transparent_in_json() {
        let id = MeetingId::new("m1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"m1\"");
    }
}
