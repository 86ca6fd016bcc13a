//! Host admission detection.
//!
//! There is no push notification for admission: the host either lets
//! the bot in, denies it, or does nothing. The detector polls the
//! page's visible UI state on a fixed tick and classifies the outcome
//! within a hard bound.

use std::time::Duration;

use tracing::trace;

use crate::page::{MeetingPage, Visibility};
use crate::selectors;

/// How a join request resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// The host let the bot into the meeting.
    Admitted,
    /// The host denied entry.
    Rejected,
    /// No resolution within the configured bound.
    TimedOut,
}

/// Polling parameters.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Overall bound on waiting for the host.
    pub timeout: Duration,
    /// Delay between UI polls.
    pub poll_interval: Duration,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(900),
            poll_interval: Duration::from_secs(3),
        }
    }
}

/// Poll the page until the admission request resolves.
///
/// Each tick evaluates three independent probes. Decision order:
/// denial first, then admission. Admission requires the in-call signal
/// to be visible while the "asking to join" signal is absent at the
/// same tick; checking both guards against repaint ordering where the
/// in-call shell renders before the lobby overlay is removed. A probe
/// that fails internally counts as signal-absent and never aborts the
/// wait.
pub async fn wait_for_admission<P: MeetingPage + ?Sized>(
    page: &P,
    config: &AdmissionConfig,
) -> AdmissionOutcome {
    let polling = async {
        let mut ticker = tokio::time::interval(config.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if page.probe(&selectors::DENIED).await == Visibility::Visible {
                return AdmissionOutcome::Rejected;
            }

            let in_call = page.probe(&selectors::IN_CALL).await;
            let waiting = page.probe(&selectors::WAITING).await;
            if in_call == Visibility::Visible && waiting != Visibility::Visible {
                return AdmissionOutcome::Admitted;
            }

            trace!(?in_call, ?waiting, "No admission resolution yet");
        }
    };

    match tokio::time::timeout(config.timeout, polling).await {
        Ok(outcome) => outcome,
        Err(_) => AdmissionOutcome::TimedOut,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::BrowserResult;
    use crate::page::{KeyChord, SelectorSpec};

    /// Per-tick scripted UI state.
    #[derive(Debug, Clone, Copy)]
    struct Tick {
        in_call: Visibility,
        waiting: Visibility,
        denied: Visibility,
    }

    impl Tick {
        fn lobby() -> Self {
            Tick {
                in_call: Visibility::NotVisible,
                waiting: Visibility::Visible,
                denied: Visibility::NotVisible,
            }
        }
    }

    /// Page whose probes replay a fixed script; the last tick repeats
    /// forever. The denial probe runs first each tick and advances the
    /// script position.
    struct ScriptedPage {
        ticks: Vec<Tick>,
        pos: AtomicUsize,
    }

    impl ScriptedPage {
        fn new(ticks: Vec<Tick>) -> Self {
            Self {
                ticks,
                pos: AtomicUsize::new(0),
            }
        }

        fn tick_at(&self, index: usize) -> Tick {
            let clamped = index.min(self.ticks.len() - 1);
            self.ticks[clamped]
        }
    }

    #[async_trait]
    impl MeetingPage for ScriptedPage {
        async fn probe(&self, spec: &SelectorSpec) -> Visibility {
            if *spec == selectors::DENIED {
                let index = self.pos.fetch_add(1, Ordering::SeqCst);
                return self.tick_at(index).denied;
            }
            let index = self.pos.load(Ordering::SeqCst).saturating_sub(1);
            let tick = self.tick_at(index);
            if *spec == selectors::IN_CALL {
                tick.in_call
            } else {
                tick.waiting
            }
        }

        async fn click(&self, _spec: &SelectorSpec) -> BrowserResult<bool> {
            Ok(false)
        }

        async fn type_into(&self, _spec: &SelectorSpec, _text: &str) -> BrowserResult<bool> {
            Ok(false)
        }

        async fn press_chord(&self, _chord: KeyChord) -> BrowserResult<()> {
            Ok(())
        }

        async fn close(&mut self) -> BrowserResult<()> {
            Ok(())
        }
    }

    fn fast_config() -> AdmissionConfig {
        AdmissionConfig {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(3),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn admitted_when_in_call_and_lobby_gone() {
        let page = ScriptedPage::new(vec![
            Tick::lobby(),
            Tick::lobby(),
            Tick {
                in_call: Visibility::Visible,
                waiting: Visibility::NotVisible,
                denied: Visibility::NotVisible,
            },
        ]);

        let outcome = wait_for_admission(&page, &fast_config()).await;
        assert_eq!(outcome, AdmissionOutcome::Admitted);
    }

    #[tokio::test(start_paused = true)]
    async fn both_signals_visible_never_admits() {
        // In-call shell painted while the lobby overlay is still up:
        // the dual condition must hold admission back.
        let page = ScriptedPage::new(vec![Tick {
            in_call: Visibility::Visible,
            waiting: Visibility::Visible,
            denied: Visibility::NotVisible,
        }]);

        let outcome = wait_for_admission(&page, &fast_config()).await;
        assert_eq!(outcome, AdmissionOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn denial_wins_over_in_call_signal() {
        let page = ScriptedPage::new(vec![Tick {
            in_call: Visibility::Visible,
            waiting: Visibility::NotVisible,
            denied: Visibility::Visible,
        }]);

        let outcome = wait_for_admission(&page, &fast_config()).await;
        assert_eq!(outcome, AdmissionOutcome::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_when_host_denies_later() {
        let page = ScriptedPage::new(vec![
            Tick::lobby(),
            Tick::lobby(),
            Tick::lobby(),
            Tick {
                in_call: Visibility::NotVisible,
                waiting: Visibility::NotVisible,
                denied: Visibility::Visible,
            },
        ]);

        let outcome = wait_for_admission(&page, &fast_config()).await;
        assert_eq!(outcome, AdmissionOutcome::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_nothing_resolves() {
        let page = ScriptedPage::new(vec![Tick::lobby()]);

        let outcome = wait_for_admission(&page, &fast_config()).await;
        assert_eq!(outcome, AdmissionOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_waiting_probe_counts_as_absent() {
        // The waiting probe errors out (Unknown) while the in-call
        // signal is up; Unknown is "absent", so this admits.
        let page = ScriptedPage::new(vec![Tick {
            in_call: Visibility::Visible,
            waiting: Visibility::Unknown,
            denied: Visibility::NotVisible,
        }]);

        let outcome = wait_for_admission(&page, &fast_config()).await;
        assert_eq!(outcome, AdmissionOutcome::Admitted);
    }

    #[tokio::test(start_paused = true)]
    async fn full_timeout_bound_is_respected() {
        let page = ScriptedPage::new(vec![Tick::lobby()]);
        let config = AdmissionConfig::default();

        let start = tokio::time::Instant::now();
        let outcome = wait_for_admission(&page, &config).await;
        assert_eq!(outcome, AdmissionOutcome::TimedOut);
        assert!(start.elapsed() >= config.timeout);
    }
}
