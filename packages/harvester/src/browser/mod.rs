//! Browser orchestration over WebDriver.
//!
//! Drives Chrome through the portal's project list and detail views and
//! hands back raw page sources. No parsing happens here.

mod detail;
mod list;
mod session;
mod wait;

pub use detail::DetailSnapshots;
pub use list::listing_from_cells;
pub use session::{chrome_arguments, chrome_capabilities, BrowserSession};
pub use wait::WaitPolicy;
