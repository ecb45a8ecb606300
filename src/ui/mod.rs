//! Result formatting: command name with matched characters emphasized, shortcut right-aligned.

mod format;
mod theme;

pub use format::{format_result, highlight_spans, line_text};
pub use theme::colors;
