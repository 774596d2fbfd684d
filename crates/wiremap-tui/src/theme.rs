//! Color palette and shared styles for the console.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ──────────────────────────────────────────────────────────

pub const COPPER: Color = Color::Rgb(222, 138, 78); // #de8a4e
pub const STEEL_BLUE: Color = Color::Rgb(122, 172, 224); // #7aace0
pub const SIGNAL_GREEN: Color = Color::Rgb(112, 219, 128); // #70db80
pub const FAULT_RED: Color = Color::Rgb(235, 92, 92); // #eb5c5c
pub const AMBER: Color = Color::Rgb(240, 200, 100); // #f0c864

pub const DIM_TEXT: Color = Color::Rgb(176, 180, 192); // #b0b4c0
pub const BORDER_GRAY: Color = Color::Rgb(96, 104, 128); // #606880
pub const BG_PANEL: Color = Color::Rgb(38, 40, 48); // #262830
pub const BG_DARK: Color = Color::Rgb(24, 26, 32); // #181a20

// ── Semantic styles ──────────────────────────────────────────────────

/// Title text for blocks and panels.
pub fn title_style() -> Style {
    Style::default().fg(COPPER).add_modifier(Modifier::BOLD)
}

/// Border of the focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(COPPER)
}

/// Border of an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(STEEL_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_TEXT)
}

/// Selected table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(COPPER)
        .bg(BG_PANEL)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(COPPER).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_TEXT)
}

/// Key hint text (e.g. "q quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// The key character inside a hint.
pub fn key_hint_key() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}
