//! Meeting status writes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use meetbot_models::{MeetingId, MeetingStatus};

use crate::client::{FirestoreClient, Value};
use crate::error::StoreResult;

/// Write-only view of the meeting record used by the worker.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Set the status field of a meeting record.
    async fn set_status(&self, meeting_id: &MeetingId, status: MeetingStatus) -> StoreResult<()>;
}

#[async_trait]
impl<T: StatusStore + ?Sized> StatusStore for std::sync::Arc<T> {
    async fn set_status(&self, meeting_id: &MeetingId, status: MeetingStatus) -> StoreResult<()> {
        (**self).set_status(meeting_id, status).await
    }
}

/// Firestore-backed status store.
pub struct FirestoreMeetingStore {
    client: FirestoreClient,
    collection: String,
}

impl FirestoreMeetingStore {
    /// Create a store over an existing client.
    pub fn new(client: FirestoreClient) -> Self {
        Self {
            client,
            collection: std::env::var("MEETINGS_COLLECTION")
                .unwrap_or_else(|_| "meetings".to_string()),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Ok(Self::new(FirestoreClient::from_env()?))
    }
}

#[async_trait]
impl StatusStore for FirestoreMeetingStore {
    async fn set_status(&self, meeting_id: &MeetingId, status: MeetingStatus) -> StoreResult<()> {
        debug_assert!(status.is_worker_writable());

        let mut fields = HashMap::new();
        fields.insert(
            "status".to_string(),
            Value::StringValue(status.as_str().to_string()),
        );
        fields.insert(
            "updatedAt".to_string(),
            Value::TimestampValue(Utc::now().to_rfc3339()),
        );

        self.client
            .update_document(&self.collection, meeting_id.as_str(), fields)
            .await?;

        info!(meeting_id = %meeting_id, status = %status, "Meeting status updated");
        Ok(())
    }
}
