//! Color palette and style constants for the roverr TUI.

use ratatui::style::{Color, Modifier, Style};

use roverr_proto::protocol::{Status, StatusClass};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_OK: Color = Color::Rgb(80, 200, 120);
pub const C_WAITING: Color = Color::Rgb(255, 184, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SEPARATOR: Color = Color::Rgb(40, 40, 52);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);
pub const C_MARKED_BG: Color = Color::Rgb(36, 30, 58);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_NUMBER_HINT: Color = Color::Rgb(90, 90, 115);
pub const C_TAG: Color = Color::Rgb(80, 140, 200);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_POPUP_BG: Color = Color::Rgb(18, 18, 26);
pub const C_FILTER_BG: Color = Color::Rgb(20, 20, 32);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);

// Status badges
pub const C_STATUS_MOVED: Color = Color::Rgb(80, 200, 120);
pub const C_STATUS_COPYING: Color = Color::Rgb(80, 160, 220);
pub const C_STATUS_NEW: Color = Color::Rgb(180, 120, 220);
pub const C_STATUS_PENDING: Color = Color::Rgb(255, 184, 80);
pub const C_STATUS_SKIPPED: Color = Color::Rgb(115, 115, 138);
pub const C_STATUS_ERROR: Color = Color::Rgb(255, 80, 80);
pub const C_STATUS_ORPHANED: Color = Color::Rgb(200, 110, 60);

pub fn status_color(status: Option<Status>) -> Color {
    match status.map(Status::class) {
        Some(StatusClass::Moved) => C_STATUS_MOVED,
        Some(StatusClass::Copying) => C_STATUS_COPYING,
        Some(StatusClass::New) => C_STATUS_NEW,
        Some(StatusClass::Pending) => C_STATUS_PENDING,
        Some(StatusClass::Skipped) => C_STATUS_SKIPPED,
        Some(StatusClass::Error) => C_STATUS_ERROR,
        Some(StatusClass::Orphaned) => C_STATUS_ORPHANED,
        None => C_MUTED,
    }
}

pub fn status_label(status: Option<Status>) -> &'static str {
    status.map_or("Unknown", Status::label)
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_selected() -> Style {
    Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY)
}

pub fn style_selected_focused() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_badge(status: Option<Status>) -> Style {
    Style::default()
        .fg(status_color(status))
        .add_modifier(Modifier::BOLD)
}
