//! Search context resolution for the two detail-page snapshots.
//!
//! A context rule is a chain of selectors. Each step narrows the context
//! found by the previous one; the chain stops at the first step that
//! matches nothing and keeps what it has, down to the whole fragment.

use scraper::Selector;

use crate::error::Result;
use crate::extract::SearchContext;
use crate::html::{compile_selector, DocumentFragment};

#[derive(Debug)]
struct ContextStep {
    name: &'static str,
    selector: Selector,
}

/// Ordered narrowing steps for one snapshot kind.
#[derive(Debug)]
pub struct ContextRule {
    steps: Vec<ContextStep>,
}

impl ContextRule {
    /// Build a rule from `(name, css selector)` steps, outermost first.
    ///
    /// # Errors
    /// Returns `Selector` if any step's selector is not valid CSS.
    pub fn new(steps: &[(&'static str, &str)]) -> Result<Self> {
        let steps = steps
            .iter()
            .map(|&(name, css)| {
                Ok(ContextStep {
                    name,
                    selector: compile_selector(css)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Resolve the narrowest context this rule can reach in `fragment`.
    #[must_use]
    pub fn resolve<'a>(&self, fragment: &'a DocumentFragment) -> SearchContext<'a> {
        let mut context = SearchContext::whole(fragment);
        for step in &self.steps {
            match context.root().select(&step.selector).next() {
                Some(element) => context = SearchContext::new(element, step.name),
                None => break,
            }
        }
        context
    }
}

/// Overview tab: the project overview component, then its card-body row.
///
/// # Errors
/// Only fails if the built-in selectors stop compiling.
pub fn overview_context_rule() -> Result<ContextRule> {
    ContextRule::new(&[
        ("overview-component", "app-project-overview"),
        ("overview-card", "div.card div.card-body div.row"),
    ])
}

/// Promoter tab: the promoter details component, then its card-body row.
///
/// # Errors
/// Only fails if the built-in selectors stop compiling.
pub fn promoter_context_rule() -> Result<ContextRule> {
    ContextRule::new(&[
        ("promoter-component", "app-promoter-details"),
        ("promoter-card", "div.promoter div.card-body div.row"),
    ])
}
