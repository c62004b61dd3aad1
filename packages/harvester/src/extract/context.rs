//! Search contexts: the sub-tree a label lookup is confined to.

use scraper::ElementRef;

use crate::html::DocumentFragment;

/// A bounded sub-tree of a [`DocumentFragment`].
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    root: ElementRef<'a>,
    origin: &'static str,
}

impl<'a> SearchContext<'a> {
    /// Create a context rooted at `root`. `origin` names the rule that picked it.
    #[must_use]
    pub fn new(root: ElementRef<'a>, origin: &'static str) -> Self {
        Self { root, origin }
    }

    /// The degraded context covering the whole fragment.
    #[must_use]
    pub fn whole(fragment: &'a DocumentFragment) -> Self {
        Self::new(fragment.root(), "document")
    }

    #[must_use]
    pub fn root(&self) -> ElementRef<'a> {
        self.root
    }

    #[must_use]
    pub fn origin(&self) -> &'static str {
        self.origin
    }
}
