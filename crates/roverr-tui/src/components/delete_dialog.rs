//! DeleteDialog: popup asking what a delete should do.
//!
//! Opens for a set of ids, lets the user flip the four flags and adjust the
//! watchlist window, then validates before anything is sent.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use roverr_proto::protocol::BatchDeleteOptions;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::help_overlay::centered_rect,
    theme::{C_ACCENT, C_MUTED, C_OK, C_PANEL_BORDER_FOCUSED, C_POPUP_BG, C_PRIMARY, C_SECONDARY},
    widgets::toast::Severity,
};

const MAX_WATCHLIST_DAYS: u32 = 365;

pub struct DeleteDialog {
    ids: Vec<String>,
    pub options: BatchDeleteOptions,
}

impl DeleteDialog {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            options: BatchDeleteOptions::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.ids.is_empty()
    }

    /// Open for `ids` with default flags. An empty set does not open.
    pub fn open(&mut self, ids: Vec<String>) {
        self.ids = ids;
        self.options = BatchDeleteOptions::default();
    }

    pub fn close(&mut self) {
        self.ids.clear();
    }

    fn confirm(&mut self) -> Vec<Action> {
        match self.options.validate() {
            Ok(()) => {
                let ids = std::mem::take(&mut self.ids);
                vec![Action::ConfirmDelete {
                    ids,
                    options: self.options.clone(),
                }]
            }
            Err(e) => vec![Action::Notify(Severity::Warning, e.to_string())],
        }
    }
}

impl Default for DeleteDialog {
    fn default() -> Self {
        Self::new()
    }
}

fn flag_row(key: char, label: &str, on: bool) -> Line<'static> {
    let (mark, color) = if on { ("[x]", C_OK) } else { ("[ ]", C_MUTED) };
    Line::from(vec![
        Span::styled(format!("  {} ", key), Style::default().fg(C_SECONDARY)),
        Span::styled(mark, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}", label), Style::default().fg(C_PRIMARY)),
    ])
}

impl Component for DeleteDialog {
    fn id(&self) -> ComponentId {
        ComponentId::DeleteDialog
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.is_open() {
            return vec![];
        }
        let o = &mut self.options;
        match key.code {
            KeyCode::Char('1') => o.delete_from_db = !o.delete_from_db,
            KeyCode::Char('2') => o.delete_from_destination = !o.delete_from_destination,
            KeyCode::Char('3') => o.ignore_movie = !o.ignore_movie,
            KeyCode::Char('4') => o.watchlist_movie = !o.watchlist_movie,
            KeyCode::Char('+') | KeyCode::Right => {
                o.watchlist_days = (o.watchlist_days + 1).min(MAX_WATCHLIST_DAYS)
            }
            KeyCode::Char('-') | KeyCode::Left => {
                o.watchlist_days = o.watchlist_days.saturating_sub(1).max(1)
            }
            KeyCode::Enter | KeyCode::Char('y') => return self.confirm(),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => self.close(),
            _ => {}
        }
        // Consume all keys while open
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.is_open() {
            return;
        }
        let popup = centered_rect(56, 13, area);
        let o = &self.options;

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" delete {} movie(s)", self.ids.len()),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            flag_row('1', "remove from dashboard", o.delete_from_db),
            flag_row('2', "delete files at destination", o.delete_from_destination),
            flag_row('3', "ignore movie in future checks", o.ignore_movie),
            flag_row('4', "add to watchlist", o.watchlist_movie),
        ];
        if o.watchlist_movie {
            lines.push(Line::from(Span::styled(
                format!("        for {} days  (- / +)", o.watchlist_days),
                Style::default().fg(C_SECONDARY),
            )));
        } else {
            lines.push(Line::from(""));
        }
        if let Err(e) = o.validate() {
            lines.push(Line::from(Span::styled(
                format!("  {}", e),
                Style::default().fg(C_ACCENT),
            )));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " enter confirm · esc cancel",
            Style::default().fg(C_MUTED),
        )));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
                    .style(Style::default().bg(C_POPUP_BG)),
            ),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::SyncStatus;
    use crate::sync::store::StoreData;
    use ratatui::crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn press(dialog: &mut DeleteDialog, c: KeyCode) -> Vec<Action> {
        let data = StoreData::default();
        let sync = SyncStatus::new("http://x", Duration::from_secs(2), Duration::from_secs(10));
        let state = AppState {
            data: &data,
            sync: &sync,
        };
        dialog.handle_key(KeyEvent::new(c, KeyModifiers::NONE), &state)
    }

    #[test]
    fn test_confirm_with_defaults_sends_ids() {
        let mut d = DeleteDialog::new();
        d.open(vec!["a".into(), "b".into()]);
        let actions = press(&mut d, KeyCode::Enter);
        match actions.as_slice() {
            [Action::ConfirmDelete { ids, options }] => {
                assert_eq!(ids, &vec!["a".to_string(), "b".to_string()]);
                assert!(options.delete_from_db);
                assert_eq!(options.watchlist_days, 7);
            }
            other => panic!("unexpected actions: {:?}", other),
        }
        assert!(!d.is_open());
    }

    #[test]
    fn test_invalid_flags_warn_and_stay_open() {
        let mut d = DeleteDialog::new();
        d.open(vec!["a".into()]);
        press(&mut d, KeyCode::Char('1'));
        let actions = press(&mut d, KeyCode::Enter);
        match actions.as_slice() {
            [Action::Notify(Severity::Warning, msg)] => {
                assert_eq!(msg, "Please select at least one option")
            }
            other => panic!("unexpected actions: {:?}", other),
        }
        assert!(d.is_open());

        press(&mut d, KeyCode::Char('4'));
        let actions = press(&mut d, KeyCode::Enter);
        assert!(matches!(
            actions.as_slice(),
            [Action::Notify(Severity::Warning, msg)] if msg == "Watchlist requires removing from dashboard"
        ));
    }

    #[test]
    fn test_watchlist_days_bounds() {
        let mut d = DeleteDialog::new();
        d.open(vec!["a".into()]);
        for _ in 0..10 {
            press(&mut d, KeyCode::Char('-'));
        }
        assert_eq!(d.options.watchlist_days, 1);
        press(&mut d, KeyCode::Char('+'));
        assert_eq!(d.options.watchlist_days, 2);
        press(&mut d, KeyCode::Esc);
        assert!(!d.is_open());
    }
}
