//! SilkCircuit Neon palette and semantic styling for the indicator.

use ratatui::style::{Color, Modifier, Style};
use wifibars_core::WifiLevel;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4

/// Untinted color of each level's icon.
pub fn level_color(level: WifiLevel) -> Color {
    match level {
        WifiLevel::NoSignal => ERROR_RED,
        WifiLevel::Poor => CORAL,
        WifiLevel::Fair => ELECTRIC_YELLOW,
        WifiLevel::Good => NEON_CYAN,
        WifiLevel::Excellent => SUCCESS_GREEN,
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border of the indicator panel while attached.
pub fn border_attached() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Border of the indicator panel while detached.
pub fn border_detached() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Status line text.
pub fn status_bar() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  v show/hide").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}
