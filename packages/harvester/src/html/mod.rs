//! HTML snapshots and DOM helpers.

mod fragment;
mod utils;

pub use fragment::DocumentFragment;
pub use utils::{
    class_contains, compile_selector, find_ancestor, find_descendant, full_text, get_tag_name,
    has_descendant_tag, parent_element, stripped_text,
};
