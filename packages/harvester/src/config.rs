//! Configuration constants and validation functions for the harvester.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{HarvesterError, Result};

/// Registered projects list on the Odisha RERA portal.
pub const DEFAULT_LIST_URL: &str = "https://rera.odisha.gov.in/projectOnlineLists/VTJGc2RHVmtYMStyRFptTFFkemNMVFU4c2Q1UlFOTE1QZVFiQkEzQmI0UT0%3D";

/// Number of projects taken from the top of the list when none is given.
pub const DEFAULT_PROJECT_COUNT: usize = 6;

/// Default chromedriver endpoint.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "rera_projects_data.json";

/// Wait for the list page (loader overlay, table rows).
pub const PAGE_WAIT_SECS: u64 = 40;

/// Wait for the project name to render on a detail view.
pub const DETAIL_WAIT_SECS: u64 = 20;

/// Wait for the promoter tab link to become clickable.
pub const TAB_WAIT_SECS: u64 = 15;

/// Wait for a row's Details button to become clickable.
pub const BUTTON_WAIT_SECS: u64 = 10;

/// Polling interval for all bounded waits.
pub const POLL_INTERVAL_MS: u64 = 500;

/// Per-request timeout for the WebDriver status check.
pub const STATUS_TIMEOUT_SECS: u64 = 5;

/// Pause after the list table renders, before rows are read.
pub const RENDER_SETTLE_MS: u64 = 2000;

/// Pause after a scroll, before clicking.
pub const SCROLL_SETTLE_MS: u64 = 1000;

/// Value of the "Projects Registered" option in the status filter.
pub const REGISTERED_STATUS_VALUE: &str = "1";

/// Desktop Chrome user agent sent by the browser session.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser window size.
pub const WINDOW_SIZE: (u32, u32) = (1920, 1200);

/// Rows of the project list table.
pub const PROJECT_ROWS_SELECTOR: &str = "table#tblviewmines tbody tr";

/// Loading overlay shown while the list is (re)fetched.
pub const LIST_LOADER_SELECTOR: &str = "ngx-ui-loader > div.ngx-overlay.loading-foreground";

/// Status filter dropdown.
pub const STATUS_FILTER_SELECTOR: &str = "select#statusFilter";

/// Details button inside a list row (relative to the row).
pub const DETAILS_BUTTON_XPATH: &str =
    ".//button[contains(@class, 'btn-info') and normalize-space(text())='Details']";

/// Promoter Details tab link on the detail view.
pub const PROMOTER_TAB_SELECTOR: &str = "a#ngb-nav-1";

/// Overview is ready once the project name carries a real value.
pub const OVERVIEW_READY_XPATH: &str = "//app-project-overview//label[@class='label-control' and contains(normalize-space(.), 'Project Name')]/following-sibling::strong[normalize-space(text()) != '--' and normalize-space(text()) != '']";

/// Promoter tab is ready once the company (or promoter) name carries a real value.
pub const PROMOTER_READY_XPATH: &str = "//app-promoter-details//label[@class='label-control' and (contains(normalize-space(.), 'Company Name') or contains(normalize-space(.), 'Name of the Promoter'))]/following-sibling::strong[normalize-space(text()) != '--' and normalize-space(text()) != '']";

/// Zero-based list column holding the project name.
pub const LIST_NAME_COLUMN: usize = 2;

/// Zero-based list column holding the registration number.
pub const LIST_REGISTRATION_COLUMN: usize = 4;

/// Default upper bound (exclusive) on the length of a reconstructed value.
pub const DEFAULT_MAX_VALUE_CHARS: usize = 500;

/// Values treated as "nothing rendered", compared case-insensitively.
pub const DEFAULT_EMPTY_TOKENS: [&str; 5] = ["n/a", "--", "na", "not applicable", ""];

/// Selector for label-bearing nodes.
pub const DEFAULT_LABEL_SELECTOR: &str = "label.label-control";

/// Token the portal renders for a field it has no data for.
pub const PLACEHOLDER_TOKEN: &str = "--";

/// Settings for the field extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// CSS selector matching label-bearing nodes.
    pub label_selector: String,

    /// Lowercase tokens that mean "no value".
    pub empty_tokens: Vec<String>,

    /// Reconstructed values with this many characters or more are rejected.
    pub max_value_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            label_selector: DEFAULT_LABEL_SELECTOR.to_string(),
            empty_tokens: DEFAULT_EMPTY_TOKENS.iter().map(|t| t.to_string()).collect(),
            max_value_chars: DEFAULT_MAX_VALUE_CHARS,
        }
    }
}

impl ExtractorConfig {
    /// Set the maximum reconstructed value length.
    #[must_use]
    pub fn with_max_value_chars(mut self, max: usize) -> Self {
        self.max_value_chars = max;
        self
    }

    /// Add a site-specific empty token.
    #[must_use]
    pub fn with_empty_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_lowercase();
        if !self.empty_tokens.contains(&token) {
            self.empty_tokens.push(token);
        }
        self
    }

    /// Check whether an already-trimmed value is one of the empty tokens.
    #[must_use]
    pub fn is_empty_token(&self, value: &str) -> bool {
        let lowered = value.to_lowercase();
        self.empty_tokens.iter().any(|t| *t == lowered)
    }
}

/// Settings for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub list_url: String,
    pub project_count: usize,
    pub webdriver_url: String,
    pub headless: bool,
    pub status_filter: Option<String>,
    pub output_path: PathBuf,
    pub page_wait: Duration,
    pub detail_wait: Duration,
    pub tab_wait: Duration,
    pub button_wait: Duration,
    pub poll_interval: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.to_string(),
            project_count: DEFAULT_PROJECT_COUNT,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            status_filter: Some(REGISTERED_STATUS_VALUE.to_string()),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            page_wait: Duration::from_secs(PAGE_WAIT_SECS),
            detail_wait: Duration::from_secs(DETAIL_WAIT_SECS),
            tab_wait: Duration::from_secs(TAB_WAIT_SECS),
            button_wait: Duration::from_secs(BUTTON_WAIT_SECS),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

impl ScrapeConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// Reads `RERA_LIST_URL`, `RERA_PROJECT_COUNT`, `WEBDRIVER_URL` and
    /// `RERA_HEADLESS`. Unparseable numbers fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let list_url = std::env::var("RERA_LIST_URL").unwrap_or(defaults.list_url);

        let project_count = std::env::var("RERA_PROJECT_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.project_count);

        let webdriver_url = std::env::var("WEBDRIVER_URL").unwrap_or(defaults.webdriver_url);

        let headless = std::env::var("RERA_HEADLESS")
            .ok()
            .map(|v| v != "false" && v != "0")
            .unwrap_or(defaults.headless);

        Self {
            list_url,
            project_count,
            webdriver_url,
            headless,
            ..defaults
        }
    }

    #[must_use]
    pub fn with_list_url(mut self, url: impl Into<String>) -> Self {
        self.list_url = url.into();
        self
    }

    #[must_use]
    pub fn with_project_count(mut self, count: usize) -> Self {
        self.project_count = count;
        self
    }

    #[must_use]
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Validate the caller-supplied parameters before any browser work.
    pub fn validate(&self) -> Result<()> {
        validate_list_url(&self.list_url)?;
        validate_project_count(self.project_count)?;
        validate_list_url(&self.webdriver_url)
    }
}

/// Validate that a URL is absolute and uses http or https.
///
/// # Examples
/// ```
/// use rera_harvester::config::validate_list_url;
///
/// assert!(validate_list_url("https://rera.odisha.gov.in/projectOnlineLists/x").is_ok());
/// assert!(validate_list_url("not a url").is_err());
/// ```
pub fn validate_list_url(url: &str) -> Result<()> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(HarvesterError::InvalidUrl(url.to_string())),
    }
}

/// Validate that at least one project is requested.
pub fn validate_project_count(count: usize) -> Result<()> {
    if count == 0 {
        Err(HarvesterError::InvalidCount(count))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_list_url_valid() {
        assert!(validate_list_url(DEFAULT_LIST_URL).is_ok());
        assert!(validate_list_url("http://localhost:9515").is_ok());
    }

    #[test]
    fn test_validate_list_url_invalid() {
        assert!(validate_list_url("").is_err());
        assert!(validate_list_url("rera.odisha.gov.in").is_err());
        assert!(validate_list_url("ftp://rera.odisha.gov.in/list").is_err());
        assert!(validate_list_url("file:///tmp/list.html").is_err());
    }

    #[test]
    fn test_validate_project_count() {
        assert!(validate_project_count(1).is_ok());
        assert!(validate_project_count(6).is_ok());
        assert!(validate_project_count(0).is_err());
    }

    #[test]
    fn test_extractor_config_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.max_value_chars, 500);
        assert_eq!(config.label_selector, "label.label-control");
        assert!(config.is_empty_token("N/A"));
        assert!(config.is_empty_token("--"));
        assert!(config.is_empty_token("Not Applicable"));
        assert!(config.is_empty_token(""));
        assert!(!config.is_empty_token("Nayagarh"));
    }

    #[test]
    fn test_extractor_config_extra_token() {
        let config = ExtractorConfig::default().with_empty_token("  Nil ");
        assert!(config.is_empty_token("NIL"));

        // Adding an existing token does not duplicate it
        let count = config.empty_tokens.len();
        let config = config.with_empty_token("nil");
        assert_eq!(config.empty_tokens.len(), count);
    }

    #[test]
    fn test_scrape_config_builder() {
        let config = ScrapeConfig::default()
            .with_project_count(3)
            .with_headless(false)
            .with_output_path("out/projects.json");

        assert_eq!(config.project_count, 3);
        assert!(!config.headless);
        assert_eq!(config.output_path, PathBuf::from("out/projects.json"));
        assert_eq!(config.status_filter.as_deref(), Some("1"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scrape_config_validate_rejects_zero_count() {
        let config = ScrapeConfig::default().with_project_count(0);
        assert!(matches!(
            config.validate(),
            Err(HarvesterError::InvalidCount(0))
        ));
    }
}
