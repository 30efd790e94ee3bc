pub mod cleaner;
pub mod r#trait;

pub use cleaner::{clean_tags, filter_generic_tags, is_generic_tag, normalize_category, render_tags};
pub use r#trait::Taggable;
