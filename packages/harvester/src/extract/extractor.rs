//! The field extractor.

use std::fmt;
use std::sync::Arc;

use scraper::{ElementRef, Selector};

use super::container::{create_container_rules, resolve_container, ContainerRule};
use super::context::SearchContext;
use super::label::LabelMatcher;
use super::observer::{ExtractionEvent, ExtractionObserver, TracingObserver};
use super::strategy::{EmphasizedValue, SiblingText, StrategyOutcome, ValueStrategy};
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::html::{compile_selector, full_text};
use crate::types::FieldResult;

/// Locates a labeled field in a search context and recovers its value.
///
/// The extractor is read-only and holds no per-call state, so one instance
/// can serve any number of documents.
pub struct FieldExtractor {
    config: ExtractorConfig,
    label_selector: Selector,
    container_rules: Vec<ContainerRule>,
    strategies: Vec<Box<dyn ValueStrategy>>,
    observer: Arc<dyn ExtractionObserver>,
}

impl FieldExtractor {
    /// Create an extractor with the portal's container rules and the
    /// emphasized-then-sibling-text strategy order.
    ///
    /// # Errors
    /// Returns `Selector` if `config.label_selector` is not valid CSS.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let label_selector = compile_selector(&config.label_selector)?;
        Ok(Self {
            config,
            label_selector,
            container_rules: create_container_rules(),
            strategies: vec![Box::new(EmphasizedValue), Box::new(SiblingText)],
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the container rule table.
    #[must_use]
    pub fn with_container_rules(mut self, rules: Vec<ContainerRule>) -> Self {
        self.container_rules = rules;
        self
    }

    /// Extract the value of `label` from `context`.
    ///
    /// Never fails: a missing label or unusable value yields
    /// [`FieldResult::NotFound`], an explicit `--` yields
    /// [`FieldResult::Placeholder`].
    pub fn extract(&self, context: &SearchContext<'_>, label: &str) -> FieldResult {
        let matcher = match LabelMatcher::new(label) {
            Ok(matcher) => matcher,
            Err(e) => {
                self.emit(ExtractionEvent::InvalidLabel {
                    label: label.to_string(),
                    message: e.to_string(),
                });
                return FieldResult::NotFound;
            }
        };

        let Some(label_node) = self.find_label(context, &matcher) else {
            self.emit(ExtractionEvent::LabelNotFound {
                label: matcher.label().to_string(),
                context: context.origin(),
            });
            return FieldResult::NotFound;
        };

        let Some((rule, container)) = resolve_container(&self.container_rules, label_node) else {
            self.emit(ExtractionEvent::ContainerUnresolved {
                label: matcher.label().to_string(),
            });
            return FieldResult::NotFound;
        };

        self.emit(ExtractionEvent::LabelMatched {
            label: matcher.label().to_string(),
            context: context.origin(),
            container: rule.name,
        });

        for strategy in &self.strategies {
            match strategy.recover(container, label_node, &self.config) {
                StrategyOutcome::Value(value) => {
                    self.emit(ExtractionEvent::ValueRecovered {
                        label: matcher.label().to_string(),
                        strategy: strategy.name(),
                        value: value.clone(),
                    });
                    return FieldResult::Value(value);
                }
                StrategyOutcome::Placeholder => {
                    self.emit(ExtractionEvent::PlaceholderFound {
                        label: matcher.label().to_string(),
                        strategy: strategy.name(),
                    });
                    return FieldResult::Placeholder;
                }
                StrategyOutcome::Rejected(reason) => {
                    self.emit(ExtractionEvent::CandidateRejected {
                        label: matcher.label().to_string(),
                        strategy: strategy.name(),
                        reason,
                    });
                }
                StrategyOutcome::NoCandidate => {
                    self.emit(ExtractionEvent::NoCandidate {
                        label: matcher.label().to_string(),
                        strategy: strategy.name(),
                    });
                }
            }
        }

        FieldResult::NotFound
    }

    /// First label node in document order whose text is the target label.
    fn find_label<'a>(
        &self,
        context: &SearchContext<'a>,
        matcher: &LabelMatcher,
    ) -> Option<ElementRef<'a>> {
        context
            .root()
            .select(&self.label_selector)
            .find(|node| matcher.matches(&full_text(*node)))
    }

    fn emit(&self, event: ExtractionEvent) {
        self.observer.on_event(&event);
    }
}

impl fmt::Debug for FieldExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldExtractor")
            .field("config", &self.config)
            .field("container_rules", &self.container_rules)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
