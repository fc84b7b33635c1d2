//! Toast notification system: transient status messages.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

/// A persistent spinner toast shown while a bulk request is in flight.
struct SpinnerToast {
    message: String,
    frame: usize,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    spinner: Option<SpinnerToast>,
    max_visible: usize,
    lifetime: Duration,
}

impl ToastManager {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            spinner: None,
            max_visible: 4,
            lifetime,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + self.lifetime,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    /// Start or replace the spinner. It stays until `resolve_spinner`.
    pub fn spinner(&mut self, message: impl Into<String>) {
        self.spinner = Some(SpinnerToast {
            message: message.into(),
            frame: 0,
        });
    }

    /// Dismiss the spinner and push a normal expiring toast in its place.
    pub fn resolve_spinner(&mut self, severity: Severity, message: impl Into<String>) {
        self.spinner = None;
        self.push(message, severity);
    }

    /// Remove expired toasts and advance the spinner frame. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if let Some(ref mut s) = self.spinner {
            s.frame = (s.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.spinner.is_none()
    }

    /// Newest first.
    pub fn messages(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.toasts
            .iter()
            .rev()
            .map(|t| (t.message.as_str(), t.severity))
    }

    pub fn has_spinner(&self) -> bool {
        self.spinner.is_some()
    }

    /// Render toasts in the top-right corner of `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60);
        let mut y = area.y + 1;

        if let Some(ref s) = self.spinner {
            let icon = SPINNER_FRAMES[s.frame % SPINNER_FRAMES.len()];
            render_line(
                frame,
                area,
                y,
                max_width,
                format!(" {} {} ", icon, &s.message),
                Style::default()
                    .fg(C_TOAST_INFO)
                    .add_modifier(Modifier::BOLD),
            );
            y += 1;
            if y >= area.y + area.height {
                return;
            }
        }

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            let (color, icon) = match toast.severity {
                Severity::Info => (C_TOAST_INFO, "·"),
                Severity::Success => (C_TOAST_SUCCESS, "✓"),
                Severity::Warning => (C_TOAST_WARNING, "!"),
                Severity::Error => (C_TOAST_ERROR, "✗"),
            };
            render_line(
                frame,
                area,
                y,
                max_width,
                format!(" {} {} ", icon, &toast.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
            y += 1;
            if y >= area.y + area.height {
                break;
            }
        }
    }
}

fn render_line(frame: &mut Frame, area: Rect, y: u16, max_width: u16, text: String, style: Style) {
    let w = (unicode_width::UnicodeWidthStr::width(text.as_str()) as u16).min(max_width);
    let x = area.x + area.width.saturating_sub(w + 1);
    let toast_area = Rect {
        x,
        y,
        width: w,
        height: 1,
    };
    frame.render_widget(Clear, toast_area);
    frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), toast_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_messages_collapse() {
        let mut t = ToastManager::new(Duration::from_secs(3));
        t.info("Move started");
        t.error("Error copying movies");
        t.info("Move started");
        let msgs: Vec<_> = t.messages().map(|(m, _)| m.to_string()).collect();
        assert_eq!(msgs, vec!["Move started", "Error copying movies"]);
    }

    #[test]
    fn test_spinner_resolves_into_toast() {
        let mut t = ToastManager::new(Duration::from_secs(3));
        t.spinner("Copying 2 movies…");
        assert!(t.has_spinner());
        t.resolve_spinner(Severity::Success, "2 movies queued for copy");
        assert!(!t.has_spinner());
        assert_eq!(
            t.messages().next(),
            Some(("2 movies queued for copy", Severity::Success))
        );
    }

    #[test]
    fn test_expired_toasts_are_dropped() {
        let mut t = ToastManager::new(Duration::ZERO);
        t.warning("No valid movies to copy");
        t.tick();
        assert!(t.is_empty());
    }
}
