//! Record assembly.
//!
//! The overview and promoter snapshots are different tab states of the
//! same detail page, so each gets its own search context before the
//! extractor runs over it.

mod assembler;
mod context;

pub use assembler::RecordAssembler;
pub use context::{overview_context_rule, promoter_context_rule, ContextRule};
