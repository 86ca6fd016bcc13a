//! Job queue over a Redis list.
//!
//! The queue is a plain FIFO list under a fixed key: producers RPUSH
//! serialized jobs, workers LPOP them. Pop is non-blocking so the
//! worker loop stays in control of its own idle backoff.

use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::error::QueueResult;
use crate::job::JoinJob;

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Redis URL
    pub redis_url: String,
    /// List key holding pending join jobs
    pub queue_key: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            queue_key: "meeting-jobs".to_string(),
        }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            queue_key: std::env::var("MEETING_QUEUE_KEY")
                .unwrap_or_else(|_| "meeting-jobs".to_string()),
        }
    }
}

/// Job queue client.
pub struct JobQueue {
    client: redis::Client,
    config: QueueConfig,
}

impl JobQueue {
    /// Create a new job queue.
    pub fn new(config: QueueConfig) -> QueueResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        Self::new(QueueConfig::from_env())
    }

    /// Verify the Redis connection is alive.
    pub async fn ping(&self) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(())
    }

    /// Enqueue a join job at the tail of the list.
    pub async fn enqueue(&self, job: &JoinJob) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let payload = serde_json::to_string(job)?;
        conn.rpush::<_, _, ()>(&self.config.queue_key, payload)
            .await?;

        debug!(meeting_id = %job.meeting_id, "Enqueued join job");
        Ok(())
    }

    /// Pop the next job from the head of the list, non-blocking.
    ///
    /// Returns `None` when the queue is empty. A payload that fails to
    /// parse is dropped with a warning rather than surfaced as an error:
    /// one poisoned message must not wedge the consumer.
    pub async fn pop(&self) -> QueueResult<Option<JoinJob>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let raw: Option<String> = conn.lpop(&self.config.queue_key, None).await?;
        let Some(payload) = raw else {
            return Ok(None);
        };

        match serde_json::from_str::<JoinJob>(&payload) {
            Ok(job) => {
                debug!(meeting_id = %job.meeting_id, "Popped join job");
                Ok(Some(job))
            }
            Err(e) => {
                warn!("Dropping malformed job payload: {}", e);
                Ok(None)
            }
        }
    }

    /// Get queue length.
    pub async fn len(&self) -> QueueResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let len: u64 = conn.llen(&self.config.queue_key).await?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_fixed_queue_key() {
        let config = QueueConfig::default();
        assert_eq!(config.queue_key, "meeting-jobs");
        assert_eq!(config.redis_url, "redis://localhost:6379");
    }
}
