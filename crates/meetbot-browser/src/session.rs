//! Browser session lifecycle.
//!
//! A worker process holds at most one live Chrome session. The session
//! is created lazily on the first job that needs it, reused by every
//! job after that, and torn down only on shutdown. Creation failure
//! fails the current job but leaves the slot empty so the next job
//! retries.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{BrowserError, BrowserResult};

/// Runs before any page script; hides the usual automation tell.
const STEALTH_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run without a visible window. Meet behaves better headful, so
    /// the default is a real window.
    pub headless: bool,
    /// Persistent profile directory, so cookies and device decisions
    /// survive across jobs and restarts.
    pub user_data_dir: Option<PathBuf>,
    /// Fixed viewport width
    pub viewport_width: u32,
    /// Fixed viewport height
    pub viewport_height: u32,
    /// User agent presented to Meet
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: false,
            user_data_dir: None,
            viewport_width: 1280,
            viewport_height: 720,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// A live browser session and its CDP event loop.
pub struct SessionHandle {
    browser: Browser,
    event_loop: JoinHandle<()>,
    config: SessionConfig,
}

impl SessionHandle {
    async fn launch(config: &SessionConfig) -> BrowserResult<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .viewport(Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                ..Default::default()
            })
            .window_size(config.viewport_width, config.viewport_height)
            .args(vec![
                "--disable-dev-shm-usage",
                "--disable-blink-features=AutomationControlled",
                // Auto-grant camera/microphone prompts with fake devices,
                // so the bot never trips a permission dialog.
                "--use-fake-ui-for-media-stream",
                "--use-fake-device-for-media-stream",
                "--disable-notifications",
            ]);

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(dir) = &config.user_data_dir {
            builder = builder.user_data_dir(dir);
        }

        let browser_config = builder.build().map_err(BrowserError::session_init)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::session_init(e.to_string()))?;

        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!("Browser session launched");
        Ok(Self {
            browser,
            event_loop,
            config: config.clone(),
        })
    }

    /// Open a fresh page in this session with the fingerprint
    /// countermeasures applied.
    pub async fn open_page(&self) -> BrowserResult<Page> {
        let page = self.browser.new_page("about:blank").await?;
        page.execute(SetUserAgentOverrideParams::new(
            self.config.user_agent.clone(),
        ))
        .await?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            STEALTH_SCRIPT.to_string(),
        ))
        .await?;
        Ok(page)
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Error closing browser: {}", e);
        }
        // The event loop exits once the CDP connection drops.
        if tokio::time::timeout(Duration::from_secs(5), &mut self.event_loop)
            .await
            .is_err()
        {
            self.event_loop.abort();
        }
    }
}

/// Owner of the process's single browser session.
pub struct SessionManager {
    config: SessionConfig,
    session: Option<SessionHandle>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Return the live session, creating it on first demand.
    pub async fn ensure(&mut self) -> BrowserResult<&SessionHandle> {
        let session = match self.session.take() {
            Some(session) => session,
            None => SessionHandle::launch(&self.config).await?,
        };
        Ok(self.session.insert(session))
    }

    /// Whether a session is currently held.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Close the session if one is held. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
            info!("Browser session closed");
        }
    }
}
