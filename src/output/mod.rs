//! Output formatting (console text and JSON summaries)

pub mod json;
pub mod text;
