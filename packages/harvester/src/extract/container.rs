//! Value container resolution.
//!
//! The portal renders each field as a label followed by its value inside
//! some wrapping block, but the wrapping block differs between sections.
//! Rules are tried in order and the first one that resolves wins.

use scraper::ElementRef;

use crate::html::{class_contains, find_ancestor, get_tag_name, parent_element};

/// How a rule finds the container for a matched label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMatch {
    /// Nearest ancestor with the given tag whose classes contain a fragment.
    AncestorClass {
        tag: &'static str,
        class_fragment: &'static str,
    },

    /// The label's immediate parent element.
    Parent,
}

/// One entry of the container rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerRule {
    /// Short name reported to observers.
    pub name: &'static str,

    pub matcher: ContainerMatch,
}

impl ContainerRule {
    #[must_use]
    pub const fn new(name: &'static str, matcher: ContainerMatch) -> Self {
        Self { name, matcher }
    }

    /// Resolve the container for `label`, or `None` if this rule does not apply.
    #[must_use]
    pub fn resolve<'a>(&self, label: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match self.matcher {
            ContainerMatch::AncestorClass {
                tag,
                class_fragment,
            } => find_ancestor(label, |a| {
                get_tag_name(a) == tag && class_contains(a, class_fragment)
            }),
            ContainerMatch::Parent => parent_element(label),
        }
    }
}

/// Create the container rule table for the RERA portal markup.
///
/// 1. `project-details`: a `div` block tagged `details-project*`
/// 2. `compact-info`: a `div` block tagged with the `ms-3` spacing class
/// 3. `parent`: the label's own parent
#[must_use]
pub fn create_container_rules() -> Vec<ContainerRule> {
    vec![
        ContainerRule::new(
            "project-details",
            ContainerMatch::AncestorClass {
                tag: "div",
                class_fragment: "details-project",
            },
        ),
        ContainerRule::new(
            "compact-info",
            ContainerMatch::AncestorClass {
                tag: "div",
                class_fragment: "ms-3",
            },
        ),
        ContainerRule::new("parent", ContainerMatch::Parent),
    ]
}

/// Apply `rules` in order and return the first resolved container.
pub fn resolve_container<'r, 'a>(
    rules: &'r [ContainerRule],
    label: ElementRef<'a>,
) -> Option<(&'r ContainerRule, ElementRef<'a>)> {
    rules
        .iter()
        .find_map(|rule| rule.resolve(label).map(|container| (rule, container)))
}
