//! Meeting join flow.
//!
//! Drives a fresh page from navigation through the pre-join screen up
//! to the point where the bot is asking to enter. Admission itself is
//! resolved separately by the detector; this module only gets the bot
//! into the lobby.

use std::time::Duration;

use chromiumoxide::Page;
use tracing::{debug, info};

use crate::error::{BrowserError, BrowserResult};
use crate::page::{CdpPage, KeyChord, MeetingPage};
use crate::selectors;
use crate::session::SessionHandle;

/// Join flow tunables.
#[derive(Debug, Clone)]
pub struct JoinSettings {
    /// Bound on reaching a quiescent page state after navigation
    pub nav_timeout: Duration,
    /// Fixed delay for Meet's dynamic UI to render after load
    pub settle_delay: Duration,
    /// Display name entered on the pre-join screen
    pub display_name: String,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            nav_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_secs(8),
            display_name: "MeetBot Notetaker".to_string(),
        }
    }
}

/// Open a page in the session and run the join flow against `link`.
///
/// On any failure after the page was opened, the page is closed before
/// the error propagates; the session itself is preserved for the next
/// job.
pub async fn join_meeting(
    session: &SessionHandle,
    link: &str,
    settings: &JoinSettings,
) -> BrowserResult<CdpPage> {
    let link = url::Url::parse(link)
        .map_err(|e| BrowserError::navigation(format!("invalid meeting link {link:?}: {e}")))?;

    let page = session.open_page().await?;
    let mut meeting_page = CdpPage::new(page.clone());

    match drive_join(&page, &meeting_page, link.as_str(), settings).await {
        Ok(()) => Ok(meeting_page),
        Err(e) => {
            if let Err(close_err) = meeting_page.close().await {
                debug!("Error closing page after failed join: {}", close_err);
            }
            Err(e)
        }
    }
}

async fn drive_join(
    raw: &Page,
    page: &CdpPage,
    link: &str,
    settings: &JoinSettings,
) -> BrowserResult<()> {
    navigate(raw, link, settings.nav_timeout).await?;
    info!(link, "Navigated to meeting");

    // Meet renders the pre-join screen well after the load event.
    tokio::time::sleep(settings.settle_delay).await;

    run_join_steps(page, settings).await
}

async fn navigate(page: &Page, link: &str, timeout: Duration) -> BrowserResult<()> {
    let nav = async {
        page.goto(link).await?;
        page.wait_for_navigation().await?;
        Ok::<_, chromiumoxide::error::CdpError>(())
    };

    match tokio::time::timeout(timeout, nav).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(BrowserError::navigation(format!("{link}: {e}"))),
        Err(_) => Err(BrowserError::navigation(format!(
            "{link}: page did not settle within {}s",
            timeout.as_secs()
        ))),
    }
}

/// The pre-join steps, expressed over the page capability trait.
///
/// Dismissal, name entry and the join control are all best-effort:
/// Meet shows different variants of the pre-join screen, and some
/// rooms auto-enter with no join button at all. Only an actual action
/// failure is an error.
pub async fn run_join_steps<P: MeetingPage + ?Sized>(
    page: &P,
    settings: &JoinSettings,
) -> BrowserResult<()> {
    if step(page.click(&selectors::CONSENT_DISMISS), "dismiss dialog").await? {
        debug!("Dismissed informational dialog");
    }

    // Mute immediately, before the host can admit the bot with a hot
    // microphone or camera.
    page.press_chord(KeyChord::ctrl('d'))
        .await
        .map_err(|e| BrowserError::step(format!("mute microphone: {e}")))?;
    page.press_chord(KeyChord::ctrl('e'))
        .await
        .map_err(|e| BrowserError::step(format!("mute camera: {e}")))?;

    if step(
        page.type_into(&selectors::NAME_FIELD, &settings.display_name),
        "enter display name",
    )
    .await?
    {
        debug!(name = %settings.display_name, "Entered display name");
    }

    if step(page.click(&selectors::ASK_TO_JOIN), "ask to join").await? {
        info!("Requested to join the meeting");
    } else if step(page.click(&selectors::JOIN_NOW), "join now").await? {
        info!("Joined the meeting directly");
    } else {
        debug!("No join control found, assuming auto-entry");
    }

    Ok(())
}

async fn step(
    action: impl std::future::Future<Output = BrowserResult<bool>>,
    what: &str,
) -> BrowserResult<bool> {
    action
        .await
        .map_err(|e| BrowserError::step(format!("{what}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::page::{SelectorSpec, Visibility};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Action {
        Click(SelectorSpec),
        Type(SelectorSpec, String),
        Chord(KeyChord),
    }

    /// Records actions; which elements "exist" is configurable.
    struct RecordingPage {
        actions: Mutex<Vec<Action>>,
        present: Vec<SelectorSpec>,
        fail_chords: bool,
    }

    impl RecordingPage {
        fn with_elements(present: Vec<SelectorSpec>) -> Self {
            Self {
                actions: Mutex::new(Vec::new()),
                present,
                fail_chords: false,
            }
        }

        fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MeetingPage for RecordingPage {
        async fn probe(&self, spec: &SelectorSpec) -> Visibility {
            if self.present.contains(spec) {
                Visibility::Visible
            } else {
                Visibility::NotVisible
            }
        }

        async fn click(&self, spec: &SelectorSpec) -> BrowserResult<bool> {
            if !self.present.contains(spec) {
                return Ok(false);
            }
            self.actions.lock().unwrap().push(Action::Click(*spec));
            Ok(true)
        }

        async fn type_into(&self, spec: &SelectorSpec, text: &str) -> BrowserResult<bool> {
            if !self.present.contains(spec) {
                return Ok(false);
            }
            self.actions
                .lock()
                .unwrap()
                .push(Action::Type(*spec, text.to_string()));
            Ok(true)
        }

        async fn press_chord(&self, chord: KeyChord) -> BrowserResult<()> {
            if self.fail_chords {
                return Err(BrowserError::step("input dispatch failed"));
            }
            self.actions.lock().unwrap().push(Action::Chord(chord));
            Ok(())
        }

        async fn close(&mut self) -> BrowserResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn full_pre_join_screen_runs_every_step() {
        let page = RecordingPage::with_elements(vec![
            selectors::CONSENT_DISMISS,
            selectors::NAME_FIELD,
            selectors::ASK_TO_JOIN,
        ]);
        let settings = JoinSettings::default();

        run_join_steps(&page, &settings).await.unwrap();

        let actions = page.actions();
        assert_eq!(
            actions,
            vec![
                Action::Click(selectors::CONSENT_DISMISS),
                Action::Chord(KeyChord::ctrl('d')),
                Action::Chord(KeyChord::ctrl('e')),
                Action::Type(selectors::NAME_FIELD, settings.display_name.clone()),
                Action::Click(selectors::ASK_TO_JOIN),
            ]
        );
    }

    #[tokio::test]
    async fn bare_auto_entry_page_still_mutes() {
        // No dialog, no name field, no join button: everything optional
        // is skipped, but muting always happens.
        let page = RecordingPage::with_elements(vec![]);

        run_join_steps(&page, &JoinSettings::default()).await.unwrap();

        let actions = page.actions();
        assert_eq!(
            actions,
            vec![
                Action::Chord(KeyChord::ctrl('d')),
                Action::Chord(KeyChord::ctrl('e')),
            ]
        );
    }

    #[tokio::test]
    async fn falls_back_to_join_now() {
        let page = RecordingPage::with_elements(vec![selectors::JOIN_NOW]);

        run_join_steps(&page, &JoinSettings::default()).await.unwrap();

        assert!(page
            .actions()
            .contains(&Action::Click(selectors::JOIN_NOW)));
    }

    #[tokio::test]
    async fn chord_failure_is_a_step_error() {
        let mut page = RecordingPage::with_elements(vec![]);
        page.fail_chords = true;

        let err = run_join_steps(&page, &JoinSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::Step(_)));
    }
}
