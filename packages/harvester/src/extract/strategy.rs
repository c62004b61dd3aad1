//! Value recovery strategies.
//!
//! Given the resolved container of a label, a strategy tries to recover the
//! field value. Strategies run in order; the extractor stops at the first
//! one that yields a value or a placeholder.

use std::fmt;

use scraper::{ElementRef, Node};

use crate::config::{ExtractorConfig, PLACEHOLDER_TOKEN};
use crate::html::{find_descendant, has_descendant_tag, stripped_text};

/// Tags that disqualify an inline `span` from sibling reconstruction.
///
/// A span holding any of these is structure, not a value fragment, and
/// often belongs to the next field.
const NESTED_STRUCTURE_TAGS: [&str; 5] = ["label", "span", "div", "table", "strong"];

/// Why a candidate value was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left after trimming.
    Empty,

    /// The candidate is one of the configured empty tokens.
    EmptyToken(String),

    /// The candidate is too long to be a single field value.
    TooLong { chars: usize, max: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty value"),
            Self::EmptyToken(token) => write!(f, "empty token '{token}'"),
            Self::TooLong { chars, max } => write!(f, "{chars} chars (limit {max})"),
        }
    }
}

/// Result of running one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// An accepted, trimmed value.
    Value(String),

    /// The explicit `--` placeholder was found. Stops the strategy chain.
    Placeholder,

    /// A candidate was found but rejected.
    Rejected(Rejection),

    /// The strategy found nothing to consider.
    NoCandidate,
}

/// Trait for value recovery strategies.
pub trait ValueStrategy: Send + Sync {
    /// Short name reported to observers.
    fn name(&self) -> &'static str;

    /// Try to recover the value of `label` from `container`.
    fn recover(
        &self,
        container: ElementRef<'_>,
        label: ElementRef<'_>,
        config: &ExtractorConfig,
    ) -> StrategyOutcome;
}

/// Primary strategy: the first `<strong>` inside the container.
pub struct EmphasizedValue;

impl ValueStrategy for EmphasizedValue {
    fn name(&self) -> &'static str {
        "emphasized"
    }

    fn recover(
        &self,
        container: ElementRef<'_>,
        _label: ElementRef<'_>,
        config: &ExtractorConfig,
    ) -> StrategyOutcome {
        let Some(strong) = find_descendant(container, "strong") else {
            return StrategyOutcome::NoCandidate;
        };

        let value = stripped_text(strong);
        if value.is_empty() {
            StrategyOutcome::Rejected(Rejection::Empty)
        } else if value == PLACEHOLDER_TOKEN {
            StrategyOutcome::Placeholder
        } else if config.is_empty_token(&value) {
            StrategyOutcome::Rejected(Rejection::EmptyToken(value))
        } else {
            StrategyOutcome::Value(value)
        }
    }
}

/// Fallback strategy: rebuild the value from the container's direct children.
///
/// Bare text, `<br>` line breaks and plain inline spans are collected; the
/// label itself and any nested structure are skipped.
pub struct SiblingText;

impl SiblingText {
    fn collect_parts(container: ElementRef<'_>, label: ElementRef<'_>) -> Vec<String> {
        let mut parts: Vec<String> = Vec::new();

        for child in container.children() {
            if child.id() == label.id() {
                continue;
            }

            match child.value() {
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed.to_string());
                    }
                }
                Node::Element(element) if element.name() == "br" => {
                    // Consecutive breaks collapse into one
                    if parts.last().is_some_and(|p| p != "\n") {
                        parts.push("\n".to_string());
                    }
                }
                Node::Element(element) if element.name() == "span" => {
                    let Some(span) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if has_descendant_tag(span, &NESTED_STRUCTURE_TAGS) {
                        continue;
                    }
                    let text = stripped_text(span);
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
                _ => {}
            }
        }

        parts
    }
}

impl ValueStrategy for SiblingText {
    fn name(&self) -> &'static str {
        "sibling-text"
    }

    fn recover(
        &self,
        container: ElementRef<'_>,
        label: ElementRef<'_>,
        config: &ExtractorConfig,
    ) -> StrategyOutcome {
        let parts = Self::collect_parts(container, label);
        if parts.is_empty() {
            return StrategyOutcome::NoCandidate;
        }

        let value = parts.join(" ").replace(" \n ", "\n").trim().to_string();
        let chars = value.chars().count();

        if value.is_empty() {
            StrategyOutcome::Rejected(Rejection::Empty)
        } else if config.is_empty_token(&value) {
            StrategyOutcome::Rejected(Rejection::EmptyToken(value))
        } else if chars >= config.max_value_chars {
            StrategyOutcome::Rejected(Rejection::TooLong {
                chars,
                max: config.max_value_chars,
            })
        } else {
            StrategyOutcome::Value(value)
        }
    }
}
