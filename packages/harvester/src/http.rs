//! WebDriver endpoint preflight.
//!
//! Checks that the WebDriver server answers `/status` and is ready to
//! create sessions before any browser work begins.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::STATUS_TIMEOUT_SECS;
use crate::error::{HarvesterError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("rera-harvester/", env!("CARGO_PKG_VERSION"));

/// Maximum number of status attempts.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    value: StatusValue,
}

#[derive(Debug, Deserialize)]
struct StatusValue {
    #[serde(default = "default_ready")]
    ready: bool,

    #[serde(default)]
    message: String,
}

const fn default_ready() -> bool {
    true
}

/// Create a configured HTTP client.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(STATUS_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// The `/status` endpoint below a WebDriver base URL.
#[must_use]
pub fn status_url(base_url: &str) -> String {
    format!("{}/status", base_url.trim_end_matches('/'))
}

/// Wait until the WebDriver server at `base_url` reports ready.
///
/// Uses exponential backoff for transient failures (connection errors,
/// 5xx responses, `ready: false`). A 4xx response fails immediately.
///
/// # Errors
/// Returns `WebDriverUnavailable` wrapping the last failure.
pub async fn wait_for_webdriver(client: &Client, base_url: &str) -> Result<()> {
    poll_status(client, &status_url(base_url))
        .await
        .map_err(|e| HarvesterError::WebDriverUnavailable {
            url: base_url.to_string(),
            message: e.to_string(),
        })
}

async fn poll_status(client: &Client, url: &str) -> Result<()> {
    let mut last_error: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // Exponential backoff: 500ms, 1000ms
            let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
            tracing::debug!(attempt, delay_ms = delay, "Retrying after delay");
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        "WebDriver server error, will retry"
                    );
                    last_error = Some(format!("Server error: {status}"));
                    continue;
                }

                let body: StatusResponse = response.error_for_status()?.json().await?;
                if body.value.ready {
                    tracing::debug!(url, "WebDriver ready");
                    return Ok(());
                }

                tracing::warn!(
                    message = %body.value.message,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "WebDriver not ready, will retry"
                );
                last_error = Some(format!("Not ready: {}", body.value.message));
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                return Err(HarvesterError::Http(e));
            }
        }
    }

    Err(HarvesterError::RetriesExhausted {
        attempts: MAX_RETRIES,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(create_client().is_ok());
    }

    #[test]
    fn test_status_url() {
        assert_eq!(status_url("http://localhost:9515"), "http://localhost:9515/status");
        assert_eq!(status_url("http://grid:4444/wd/hub/"), "http://grid:4444/wd/hub/status");
    }

    #[test]
    fn test_status_body_defaults_ready() {
        let body: StatusResponse = serde_json::from_str(r#"{"value": {}}"#).unwrap();
        assert!(body.value.ready);

        let body: StatusResponse =
            serde_json::from_str(r#"{"value": {"ready": false, "message": "busy"}}"#).unwrap();
        assert!(!body.value.ready);
        assert_eq!(body.value.message, "busy");
    }
}
