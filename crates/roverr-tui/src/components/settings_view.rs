//! SettingsView: flat key/value listing of the backend settings record.
//!
//! Booleans can be flipped in place; the whole record is posted back.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use serde_json::Value;

use roverr_proto::protocol::SettingsRecord;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_default, style_muted, style_secondary, style_selected_focused, C_OK, C_ACCENT},
    widgets::pane_chrome::pane_chrome,
    widgets::scrollable_list::ScrollableList,
};

#[derive(Debug, Clone)]
pub struct SettingEntry {
    pub key: String,
    pub value: Value,
}

fn entry_key(e: &SettingEntry) -> &str {
    &e.key
}

/// Single-line rendering of a settings value.
pub fn value_text(v: &Value) -> String {
    match v {
        Value::Null => "—".to_string(),
        Value::String(s) if s.is_empty() => "\"\"".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) => format!("{{{} keys}}", map.len()),
        other => other.to_string(),
    }
}

/// Record with `key` flipped, if it holds a boolean.
pub fn toggled(record: &SettingsRecord, key: &str) -> Option<SettingsRecord> {
    let current = record.get(key)?.as_bool()?;
    let mut next = record.clone();
    next.insert(key.to_string(), Value::Bool(!current));
    Some(next)
}

pub struct SettingsView {
    list: ScrollableList<SettingEntry>,
}

impl SettingsView {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(entry_key),
        }
    }

    /// Replace the listing, keys sorted.
    pub fn rebuild(&mut self, record: &SettingsRecord) {
        let mut entries: Vec<SettingEntry> = record
            .iter()
            .map(|(k, v)| SettingEntry {
                key: k.clone(),
                value: v.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        self.list.set_items(entries);
    }

    pub fn entries(&self) -> &[SettingEntry] {
        self.list.items()
    }
}

impl Default for SettingsView {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SettingsView {
    fn id(&self) -> ComponentId {
        ComponentId::Settings
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.list.select_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.list.select_up(1),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::Char('g') | KeyCode::Home => self.list.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(entry) = self.list.selected_item() else {
                    return vec![];
                };
                let next = state
                    .data
                    .settings
                    .as_ref()
                    .and_then(|record| toggled(record, &entry.key));
                return match next {
                    Some(next) => vec![Action::SaveSettings(next)],
                    None => vec![],
                };
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane_chrome("settings", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(" no settings loaded", style_muted()))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let key_width = self
            .list
            .items()
            .iter()
            .map(|e| e.key.len())
            .max()
            .unwrap_or(0)
            .min(40);

        let lines: Vec<Line> = self
            .list
            .visible_items(height)
            .into_iter()
            .map(|(i, e)| {
                let value_style = match e.value {
                    Value::Bool(true) => Style::default().fg(C_OK),
                    Value::Bool(false) => Style::default().fg(C_ACCENT),
                    _ => style_default(),
                };
                let line = Line::from(vec![
                    Span::styled(format!(" {:<width$}  ", e.key, width = key_width), style_secondary()),
                    Span::styled(value_text(&e.value), value_style),
                ]);
                if focused && i == self.list.selected {
                    line.style(style_selected_focused())
                } else {
                    line
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
