//! Exact, case-insensitive label matching.

use regex::Regex;

use crate::error::Result;

/// Matches label text against one target label.
///
/// Surrounding whitespace and letter case are ignored. The match is
/// anchored, so "Name" never matches "Promoter Name".
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    label: String,
    pattern: Regex,
}

impl LabelMatcher {
    /// Build a matcher for `label`.
    ///
    /// # Examples
    /// ```
    /// use rera_harvester::extract::LabelMatcher;
    ///
    /// let matcher = LabelMatcher::new("GST No.").unwrap();
    /// assert!(matcher.matches("\n   gst no.  "));
    /// assert!(!matcher.matches("GST No"));
    /// assert!(!matcher.matches("Promoter GST No."));
    /// ```
    pub fn new(label: &str) -> Result<Self> {
        let label = label.trim().to_string();
        let pattern = Regex::new(&format!(r"(?i)^\s*{}\s*$", regex::escape(&label)))?;
        Ok(Self { label, pattern })
    }

    /// The trimmed target label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check whether `text` is the target label.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}
