//! Render one match result as a palette row.

use std::ops::Range;

use ratatui::text::{Line, Span};

use crate::host::Host;
use crate::state::MatchResult;
use crate::ui::theme::{match_style, name_style, shortcut_style, SHORTCUT_GAP};

/// Split `name` into spans, styling the chars covered by `ranges` as matches.
pub fn highlight_spans(name: &str, ranges: &[Range<usize>]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_matched = false;
    for (i, c) in name.chars().enumerate() {
        let matched = ranges.iter().any(|r| r.contains(&i));
        if matched != run_matched && !run.is_empty() {
            spans.push(styled_run(std::mem::take(&mut run), run_matched));
        }
        run_matched = matched;
        run.push(c);
    }
    if !run.is_empty() {
        spans.push(styled_run(run, run_matched));
    }
    spans
}

fn styled_run(text: String, matched: bool) -> Span<'static> {
    Span::styled(text, if matched { match_style() } else { name_style() })
}

/// Name with highlights, then the primary shortcut right-aligned to `width`.
///
/// Only the first key binding is shown. If the row is wider than `width`
/// the shortcut still gets a small gap instead of overlapping the name.
pub fn format_result<H: Host>(host: &H, item: &MatchResult, width: u16) -> Line<'static> {
    let mut spans = highlight_spans(&item.name, &item.matched_ranges);

    let shortcut = host
        .keybindings_for(&item.id)
        .first()
        .map(|binding| host.format_key_descriptor(binding.display()))
        .unwrap_or_default();
    if !shortcut.is_empty() {
        let shortcut = Span::styled(shortcut, shortcut_style());
        // Display columns, so wide (CJK) names still line up.
        let used = spans.iter().map(Span::width).sum::<usize>() + shortcut.width();
        let pad = (width as usize).saturating_sub(used).max(SHORTCUT_GAP);
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(shortcut);
    }
    Line::from(spans)
}

/// Plain text of a rendered line.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
