//! Label-driven field extraction.
//!
//! A field is located by its visible caption (a `label.label-control`
//! element), then its value is recovered from the nearest enclosing value
//! container. Containers are found through an ordered rule table and values
//! through an ordered list of strategies; in both cases the first match wins.
//!
//! ```
//! use rera_harvester::extract::{FieldExtractor, SearchContext};
//! use rera_harvester::html::DocumentFragment;
//! use rera_harvester::types::FieldResult;
//!
//! let fragment = DocumentFragment::parse(
//!     r#"<div class="details-project">
//!          <label class="label-control">Project Name</label>
//!          <strong>Sunrise Heights</strong>
//!        </div>"#,
//! );
//! let extractor = FieldExtractor::new(Default::default()).unwrap();
//! let context = SearchContext::whole(&fragment);
//!
//! assert_eq!(
//!     extractor.extract(&context, "project name"),
//!     FieldResult::Value("Sunrise Heights".to_string())
//! );
//! ```

mod container;
mod context;
mod extractor;
mod label;
mod observer;
mod strategy;

pub use container::{create_container_rules, resolve_container, ContainerMatch, ContainerRule};
pub use context::SearchContext;
pub use extractor::FieldExtractor;
pub use label::LabelMatcher;
pub use observer::{ExtractionEvent, ExtractionObserver, RecordingObserver, TracingObserver};
pub use strategy::{
    EmphasizedValue, Rejection, SiblingText, StrategyOutcome, ValueStrategy,
};
