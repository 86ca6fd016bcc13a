//! The worker loop.
//!
//! One job at a time, end to end: dequeue, ensure the shared session,
//! drive the join flow, wait for the host, write the terminal status.
//! A job's failure is absorbed at the job boundary; only a shutdown
//! signal stops the loop.

use tokio::sync::watch;
use tracing::{error, info, warn};

use meetbot_browser::{wait_for_admission, AdmissionOutcome, JoinAutomation, MeetingPage};
use meetbot_models::MeetingStatus;
use meetbot_queue::{JobSource, JoinJob};
use meetbot_store::StatusStore;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};

/// Handle for requesting cooperative shutdown from another task, e.g.
/// a signal handler.
#[derive(Clone)]
pub struct ShutdownHandle(watch::Sender<bool>);

impl ShutdownHandle {
    /// Ask the worker to stop. The in-flight job, if any, runs to its
    /// next natural suspension point first.
    pub fn signal(&self) {
        let _ = self.0.send(true);
    }
}

/// The per-process worker: owns the queue consumer, the status store
/// handle and the single browser session.
pub struct Worker<Q, S, B> {
    config: WorkerConfig,
    queue: Q,
    store: S,
    browser: B,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    stopped: bool,
}

impl<Q, S, B> Worker<Q, S, B>
where
    Q: JobSource,
    S: StatusStore,
    B: JoinAutomation,
{
    pub fn new(config: WorkerConfig, queue: Q, store: S, browser: B) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            queue,
            store,
            browser,
            shutdown_tx,
            shutdown_rx,
            stopped: false,
        }
    }

    /// Handle for signaling shutdown from outside the loop.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.shutdown_tx.clone())
    }

    /// Run until shutdown is signaled.
    ///
    /// Each iteration makes one non-blocking dequeue attempt. A job is
    /// handled synchronously end to end; an empty queue or a dequeue
    /// failure is followed by the fixed poll-interval sleep. Dequeue
    /// failures are retried indefinitely.
    pub async fn run(&mut self) {
        info!("Meeting worker started, waiting for jobs");

        while !*self.shutdown_rx.borrow() {
            match self.queue.pop().await {
                Ok(Some(job)) => {
                    info!(meeting_id = %job.meeting_id, link = %job.meet_link, "Received join job");
                    self.handle_job(&job).await;
                }
                Ok(None) => {
                    self.idle_sleep().await;
                }
                Err(e) => {
                    error!("Dequeue failed: {}", e);
                    self.idle_sleep().await;
                }
            }
        }

        self.stop().await;
    }

    /// Idempotent shutdown: clears the running flag and closes the
    /// held browser session if any. The queue and store connections
    /// are released when the worker is dropped.
    pub async fn stop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if self.stopped {
            return;
        }
        self.stopped = true;

        self.browser.shutdown().await;
        info!("Worker stopped");
    }

    /// Sleep the fixed poll interval, waking early on shutdown.
    async fn idle_sleep(&mut self) {
        tokio::select! {
            _ = tokio::time::sleep(self.config.poll_interval) => {}
            _ = self.shutdown_rx.changed() => {}
        }
    }

    /// The per-job error boundary. Every failure becomes a FAILED
    /// status write; nothing escapes to the loop.
    async fn handle_job(&mut self, job: &JoinJob) {
        if let Err(e) = self.try_join(job).await {
            error!(meeting_id = %job.meeting_id, "Join failed: {}", e);
            if let Err(store_err) = self
                .store
                .set_status(&job.meeting_id, MeetingStatus::Failed)
                .await
            {
                // The record stays at JOINING; accepted liveness gap.
                error!(
                    meeting_id = %job.meeting_id,
                    "Could not record FAILED status: {}", store_err
                );
            }
        }
    }

    async fn try_join(&mut self, job: &JoinJob) -> WorkerResult<()> {
        self.store
            .set_status(&job.meeting_id, MeetingStatus::Joining)
            .await?;

        self.browser.ensure_session().await?;
        let mut page = self.browser.join_meeting(&job.meet_link).await?;

        let outcome = wait_for_admission(&page, &self.config.admission).await;
        match outcome {
            AdmissionOutcome::Admitted => {
                self.store
                    .set_status(&job.meeting_id, MeetingStatus::InProgress)
                    .await?;
                info!(meeting_id = %job.meeting_id, "Bot admitted to meeting");
                Ok(())
            }
            AdmissionOutcome::Rejected => {
                self.close_page(&mut page).await;
                Err(WorkerError::AdmissionRejected)
            }
            AdmissionOutcome::TimedOut => {
                self.close_page(&mut page).await;
                Err(WorkerError::AdmissionTimeout)
            }
        }
    }

    /// Close the job's page; the session stays up for the next job.
    async fn close_page(&self, page: &mut B::Page) {
        if let Err(e) = page.close().await {
            warn!("Error closing page: {}", e);
        }
    }
}
