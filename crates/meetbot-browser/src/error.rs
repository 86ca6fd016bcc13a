//! Browser automation error types.

use thiserror::Error;

pub type BrowserResult<T> = Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// Launching the browser session failed. Only the current job fails;
    /// the session slot stays empty so the next job retries creation.
    #[error("Session init failed: {0}")]
    SessionInit(String),

    /// The page did not reach a usable state within the navigation bound.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// A required join step failed after navigation.
    #[error("Join step failed: {0}")]
    Step(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

impl BrowserError {
    pub fn session_init(msg: impl Into<String>) -> Self {
        Self::SessionInit(msg.into())
    }

    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::Navigation(msg.into())
    }

    pub fn step(msg: impl Into<String>) -> Self {
        Self::Step(msg.into())
    }
}
