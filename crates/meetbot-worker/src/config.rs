//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use meetbot_browser::{AdmissionConfig, JoinSettings, SessionConfig};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Sleep between dequeue attempts when the queue is empty, and the
    /// backoff after a dequeue failure
    pub poll_interval: Duration,
    /// Admission polling parameters
    pub admission: AdmissionConfig,
    /// Join flow parameters
    pub join: JoinSettings,
    /// Browser session parameters
    pub session: SessionConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(15_000),
            admission: AdmissionConfig::default(),
            join: JoinSettings::default(),
            session: SessionConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            poll_interval: env_ms("WORKER_POLL_INTERVAL_MS", defaults.poll_interval),
            admission: AdmissionConfig {
                timeout: env_ms("ADMISSION_TIMEOUT_MS", defaults.admission.timeout),
                poll_interval: env_ms(
                    "ADMISSION_POLL_INTERVAL_MS",
                    defaults.admission.poll_interval,
                ),
            },
            join: JoinSettings {
                nav_timeout: env_ms("NAV_TIMEOUT_MS", defaults.join.nav_timeout),
                settle_delay: env_ms("JOIN_SETTLE_DELAY_MS", defaults.join.settle_delay),
                display_name: std::env::var("BOT_DISPLAY_NAME")
                    .unwrap_or(defaults.join.display_name),
            },
            session: SessionConfig {
                headless: std::env::var("BROWSER_HEADLESS")
                    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                    .unwrap_or(defaults.session.headless),
                user_data_dir: std::env::var("BROWSER_PROFILE_DIR")
                    .ok()
                    .map(PathBuf::from),
                ..defaults.session
            },
        }
    }
}

fn env_ms(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
