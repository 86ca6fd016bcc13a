//! Worker-facing automation surface.
//!
//! The worker loop drives joining through this trait so the loop can
//! be tested with a scripted automation stack instead of a browser.

use async_trait::async_trait;

use crate::automation::{self, JoinSettings};
use crate::error::BrowserResult;
use crate::page::{CdpPage, MeetingPage};
use crate::session::{SessionConfig, SessionManager};

/// Everything the worker loop needs from the browser side.
#[async_trait]
pub trait JoinAutomation: Send {
    type Page: MeetingPage;

    /// Create the session if none is held. Reuses an existing one.
    async fn ensure_session(&mut self) -> BrowserResult<()>;

    /// Whether a live session is currently held.
    fn session_active(&self) -> bool;

    /// Run the join flow for `link` against the held session.
    async fn join_meeting(&mut self, link: &str) -> BrowserResult<Self::Page>;

    /// Tear down the session if one is held.
    async fn shutdown(&mut self);
}

/// Production automation stack: one Chrome session plus the Meet join
/// flow.
pub struct MeetBrowser {
    sessions: SessionManager,
    settings: JoinSettings,
}

impl MeetBrowser {
    pub fn new(session_config: SessionConfig, settings: JoinSettings) -> Self {
        Self {
            sessions: SessionManager::new(session_config),
            settings,
        }
    }
}

#[async_trait]
impl JoinAutomation for MeetBrowser {
    type Page = CdpPage;

    async fn ensure_session(&mut self) -> BrowserResult<()> {
        self.sessions.ensure().await?;
        Ok(())
    }

    fn session_active(&self) -> bool {
        self.sessions.is_active()
    }

    async fn join_meeting(&mut self, link: &str) -> BrowserResult<CdpPage> {
        let session = self.sessions.ensure().await?;
        automation::join_meeting(session, link, &self.settings).await
    }

    async fn shutdown(&mut self) {
        self.sessions.close().await;
    }
}
