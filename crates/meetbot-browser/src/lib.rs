//! Browser session management and Meet join automation.
//!
//! This crate provides:
//! - A session manager owning at most one live Chrome session per process
//! - The join flow that drives a page up to the "asking to join" state
//! - Admission detection via bounded-timeout UI polling
//!
//! The automation steps and the admission detector operate on the
//! `MeetingPage` capability trait rather than on the CDP page directly,
//! so both can be exercised against fakes without a browser.

pub mod admission;
pub mod automation;
pub mod bot;
pub mod error;
pub mod page;
pub mod selectors;
pub mod session;

pub use admission::{wait_for_admission, AdmissionConfig, AdmissionOutcome};
pub use automation::{join_meeting, JoinSettings};
pub use bot::{JoinAutomation, MeetBrowser};
pub use error::{BrowserError, BrowserResult};
pub use page::{CdpPage, KeyChord, MeetingPage, SelectorSpec, Visibility};
pub use session::{SessionConfig, SessionHandle, SessionManager};
