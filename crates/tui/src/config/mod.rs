use std::time::Duration;

use serde::Deserialize;

/// Timing of the UI. A zero delay commits the state change immediately.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Minimum time the readiness overlay stays up after the backend answers.
    pub readiness_delay_ms: u64,
    /// Pause between the end of an import and showing its outcome.
    pub import_delay_ms: u64,
    /// How long the initial fetch of the shared expenses may take.
    pub fetch_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            readiness_delay_ms: 1_000,
            import_delay_ms: 1_000,
            fetch_timeout_ms: 10_000,
        }
    }
}

impl UiConfig {
    pub fn readiness_delay(&self) -> Duration {
        Duration::from_millis(self.readiness_delay_ms)
    }

    pub fn import_delay(&self) -> Duration {
        Duration::from_millis(self.import_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
