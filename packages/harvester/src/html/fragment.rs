//! Parsed page snapshots.

use scraper::{ElementRef, Html};

/// An immutable, parsed snapshot of one rendered page state.
///
/// Search contexts borrow from the fragment, so it must outlive every
/// extraction run against it.
pub struct DocumentFragment {
    html: Html,
}

impl DocumentFragment {
    /// Parse a page source (as returned by the browser) into a fragment.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// The root `<html>` element.
    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

}

impl std::fmt::Debug for DocumentFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFragment")
            .field("nodes", &self.html.tree.nodes().count())
            .finish()
    }
}
