//! Palette row colors.

use ratatui::style::{Color, Modifier, Style};

pub mod colors {
    use super::*;
    /// Command name text.
    pub const TEXT: Color = Color::Rgb(0xf2, 0xf4, 0xf8);
    /// Characters matched by the query.
    pub const ACCENT: Color = Color::Rgb(0x6b, 0xbc, 0xff);
    /// Shortcut hint on the right.
    pub const MUTED: Color = Color::Rgb(0x94, 0x9e, 0xad);
}

pub fn name_style() -> Style {
    Style::default().fg(colors::TEXT)
}

pub fn match_style() -> Style {
    Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD)
}

pub fn shortcut_style() -> Style {
    Style::default().fg(colors::MUTED)
}

/// Gap kept between the name and the shortcut.
pub const SHORTCUT_GAP: usize = 2;
