//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

use couponly_core::Severity;

// ── Palette ───────────────────────────────────────────────────────────

pub const INDIGO: Color = Color::Rgb(99, 102, 241); // #6366f1
pub const INDIGO_LIGHT: Color = Color::Rgb(199, 210, 254); // #c7d2fe
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const WARNING_AMBER: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const INFO_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(INDIGO_LIGHT).add_modifier(Modifier::BOLD)
}

pub fn subtitle_style() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn border_focused() -> Style {
    Style::default().fg(INDIGO)
}

/// Foreground colour for a message severity.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => INFO_BLUE,
        Severity::Success => SUCCESS_GREEN,
        Severity::Warning => WARNING_AMBER,
        Severity::Error => ERROR_RED,
    }
}

pub fn message_style(severity: Severity) -> Style {
    Style::default().fg(severity_color(severity))
}

pub fn coupon_code() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn copied_badge() -> Style {
    Style::default()
        .fg(BG_DARK)
        .bg(SUCCESS_GREEN)
        .add_modifier(Modifier::BOLD)
}

pub fn timer() -> Style {
    Style::default()
        .fg(WARNING_AMBER)
        .add_modifier(Modifier::BOLD)
}

pub fn button_enabled() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(INDIGO)
        .add_modifier(Modifier::BOLD)
}

pub fn button_disabled() -> Style {
    Style::default().fg(DIM_WHITE).bg(BORDER_GRAY)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(INDIGO_LIGHT).add_modifier(Modifier::BOLD)
}
