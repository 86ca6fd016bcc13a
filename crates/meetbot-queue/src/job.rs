//! Join job wire type.

use serde::{Deserialize, Serialize};

use meetbot_models::MeetingId;

/// Request for the bot to join a meeting.
///
/// Produced by the API side and pushed onto the Redis list; consumed
/// at most once by a worker. There is no acknowledgment protocol: a
/// popped job is claimed the instant it is returned, and is lost if
/// the worker crashes before writing a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinJob {
    /// Meeting record to update as the join progresses
    pub meeting_id: MeetingId,
    /// Meeting URL to navigate to
    pub meet_link: String,
    /// User who requested the bot
    pub requester_id: String,
}

impl JoinJob {
    /// Create a new join job.
    pub fn new(
        meeting_id: impl Into<MeetingId>,
        meet_link: impl Into<String>,
        requester_id: impl Into<String>,
    ) -> Self {
        Self {
            meeting_id: meeting_id.into(),
            meet_link: meet_link.into(),
            requester_id: requester_id.into(),
        }
    }
}
