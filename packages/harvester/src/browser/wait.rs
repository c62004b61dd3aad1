//! Bounded waits.

use std::time::Duration;

use crate::config::ScrapeConfig;
use crate::error::HarvesterError;

/// Timeouts for the browsing steps, all polled at `poll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub page: Duration,
    pub detail: Duration,
    pub tab: Duration,
    pub button: Duration,
    pub poll: Duration,
}

impl From<&ScrapeConfig> for WaitPolicy {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            page: config.page_wait,
            detail: config.detail_wait,
            tab: config.tab_wait,
            button: config.button_wait,
            poll: config.poll_interval,
        }
    }
}

/// Error for a wait on `what` that ran out after `timeout`.
pub(crate) fn timed_out(what: &str, timeout: Duration) -> HarvesterError {
    HarvesterError::Timeout {
        what: what.to_string(),
        secs: timeout.as_secs(),
    }
}

/// Give the page time to finish rendering.
pub(crate) async fn settle(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
