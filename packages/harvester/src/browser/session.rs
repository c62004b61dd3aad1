//! WebDriver session setup.

use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;
use thirtyfour::ChromiumLikeCapabilities;

use crate::config::{ScrapeConfig, BROWSER_USER_AGENT, WINDOW_SIZE};
use crate::error::Result;

use super::wait::WaitPolicy;

/// Chrome command-line arguments for a scrape session.
#[must_use]
pub fn chrome_arguments(headless: bool) -> Vec<String> {
    let mut args = Vec::new();
    if headless {
        args.push("--headless".to_string());
    }
    args.push("--no-sandbox".to_string());
    args.push("--disable-dev-shm-usage".to_string());
    args.push(format!("--window-size={},{}", WINDOW_SIZE.0, WINDOW_SIZE.1));
    args.push(format!("user-agent={BROWSER_USER_AGENT}"));
    args
}

/// Build the Chrome capabilities for a scrape session.
pub fn chrome_capabilities(headless: bool) -> Result<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    for arg in chrome_arguments(headless) {
        caps.add_arg(&arg)?;
    }
    Ok(caps)
}

/// A live browser driven through WebDriver.
///
/// Call [`BrowserSession::quit`] when done; dropping the session leaves
/// the browser process to the WebDriver server.
pub struct BrowserSession {
    pub(super) driver: WebDriver,
    pub(super) waits: WaitPolicy,
    pub(super) list_url: String,
    pub(super) status_filter: Option<String>,
}

impl BrowserSession {
    /// Start a Chrome session on the configured WebDriver server.
    pub async fn connect(config: &ScrapeConfig) -> Result<Self> {
        let caps = chrome_capabilities(config.headless)?;
        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;

        tracing::info!(
            webdriver = %config.webdriver_url,
            headless = config.headless,
            "Browser session started"
        );

        Ok(Self {
            driver,
            waits: WaitPolicy::from(config),
            list_url: config.list_url.clone(),
            status_filter: config.status_filter.clone(),
        })
    }

    /// Close the browser and end the session.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        tracing::info!("Browser session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headless_arguments() {
        let args = chrome_arguments(true);
        assert_eq!(args[0], "--headless");
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-dev-shm-usage".to_string()));
        assert!(args.contains(&"--window-size=1920,1200".to_string()));
        assert!(args.iter().any(|a| a.starts_with("user-agent=Mozilla/5.0")));
    }

    #[test]
    fn test_visible_arguments() {
        let args = chrome_arguments(false);
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_capabilities_build() {
        assert!(chrome_capabilities(true).is_ok());
    }
}
