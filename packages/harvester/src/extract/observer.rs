//! Observation hooks for the extractor.

use std::sync::Mutex;

use super::strategy::Rejection;

/// A step taken while extracting one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent {
    /// The label could not be compiled into a pattern.
    InvalidLabel { label: String, message: String },

    /// No label node in the context carries the target text.
    LabelNotFound { label: String, context: &'static str },

    /// A label node was found and a container resolved for it.
    LabelMatched {
        label: String,
        context: &'static str,
        container: &'static str,
    },

    /// A label node was found but no container rule applied.
    ContainerUnresolved { label: String },

    /// A strategy found nothing to consider.
    NoCandidate {
        label: String,
        strategy: &'static str,
    },

    /// A strategy found a candidate but rejected it.
    CandidateRejected {
        label: String,
        strategy: &'static str,
        reason: Rejection,
    },

    /// A strategy hit the explicit placeholder.
    PlaceholderFound {
        label: String,
        strategy: &'static str,
    },

    /// A strategy produced the value.
    ValueRecovered {
        label: String,
        strategy: &'static str,
        value: String,
    },
}

/// Receives extraction events.
pub trait ExtractionObserver: Send + Sync {
    fn on_event(&self, event: &ExtractionEvent);
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_event(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::InvalidLabel { label, message } => {
                tracing::warn!(label = %label, error = %message, "Invalid label pattern");
            }
            ExtractionEvent::LabelNotFound { label, context } => {
                tracing::debug!(label = %label, context, "Label not found");
            }
            ExtractionEvent::LabelMatched {
                label,
                context,
                container,
            } => {
                tracing::debug!(label = %label, context, container, "Label matched");
            }
            ExtractionEvent::ContainerUnresolved { label } => {
                tracing::debug!(label = %label, "No value container for label");
            }
            ExtractionEvent::NoCandidate { label, strategy } => {
                tracing::debug!(label = %label, strategy, "No candidate value");
            }
            ExtractionEvent::CandidateRejected {
                label,
                strategy,
                reason,
            } => {
                tracing::debug!(label = %label, strategy, reason = %reason, "Candidate rejected");
            }
            ExtractionEvent::PlaceholderFound { label, strategy } => {
                tracing::debug!(label = %label, strategy, "Placeholder value");
            }
            ExtractionEvent::ValueRecovered {
                label,
                strategy,
                value,
            } => {
                tracing::debug!(label = %label, strategy, value = %value, "Value recovered");
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExtractionObserver for RecordingObserver {
    fn on_event(&self, event: &ExtractionEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
