//! TorrentTable: sortable table of every torrent the backend tracks.
//!
//! Rows are rebuilt from scratch on every torrents update and on every sort
//! change; nothing is carried over between rebuilds except the cursor, which
//! follows its hash.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Row, Table, TableState},
    Frame,
};

use roverr_proto::protocol::{CopyProgress, Entity, Status, TorrentRecord};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    sync::reconcile::{short_id, FullRebuild, SortField, SortSpec},
    sync::store::{StoreData, View},
    theme::{
        status_label, style_badge, style_default, style_muted, style_secondary,
        style_selected, style_selected_focused, C_SECONDARY,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
    widgets::progress_bar::{bar_string, fmt_speed},
};

#[derive(Debug, Clone, PartialEq)]
pub struct TorrentRow {
    pub hash: String,
    pub name: String,
    pub status: Option<Status>,
    /// Fraction 0..=1.
    pub progress: f64,
    pub size: u64,
    pub ratio: f64,
    pub added_on: i64,
    pub completion_on: i64,
    pub state: String,
    pub copy: Option<CopyProgress>,
    pub message: Option<String>,
}

impl TorrentRow {
    pub fn from_entity(entity: &Entity<TorrentRecord>) -> Self {
        match entity {
            Entity::Valid(t) => Self {
                hash: t.hash.clone(),
                name: t.name.clone(),
                status: Some(t.status),
                progress: t.progress,
                size: t.size,
                ratio: t.ratio,
                added_on: t.added_on,
                completion_on: t.completion_on,
                state: t.state.clone(),
                copy: t.copy_progress.clone(),
                message: t.message.clone(),
            },
            Entity::Malformed(bad) => Self {
                hash: bad.id.clone(),
                name: bad.title.clone().unwrap_or_else(|| short_id(&bad.id)),
                status: None,
                progress: bad.progress.unwrap_or(0.0),
                size: 0,
                ratio: 0.0,
                added_on: 0,
                completion_on: 0,
                state: String::new(),
                copy: None,
                message: Some(bad.reason.clone()),
            },
        }
    }

    /// Status cell text; a running copy shows its progress inline.
    pub fn status_text(&self) -> String {
        match (&self.status, &self.copy) {
            (Some(Status::Copying), Some(copy)) => format!(
                "{} {:.0}% {}",
                status_label(self.status),
                copy.percent,
                fmt_speed(copy.speed)
            ),
            _ => status_label(self.status).to_string(),
        }
    }
}

/// `1.4 GB`
pub fn fmt_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Unix seconds as local `YYYY-MM-DD HH:MM`; zero and negatives read as unset.
pub fn fmt_timestamp(secs: i64) -> String {
    if secs <= 0 {
        return "—".to_string();
    }
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "—".to_string())
}

pub struct TorrentTable {
    rows: FullRebuild<TorrentRow>,
    sort: SortSpec,
    table_state: TableState,
}

impl TorrentTable {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            rows: FullRebuild::new(),
            sort,
            table_state: TableState::default(),
        }
    }

    pub fn rows(&self) -> &[TorrentRow] {
        self.rows.rows()
    }

    pub fn generation(&self) -> u64 {
        self.rows.generation()
    }

    pub fn selected_hash(&self) -> Option<&str> {
        self.table_state
            .selected()
            .and_then(|i| self.rows.rows().get(i))
            .map(|r| r.hash.as_str())
    }

    /// Regenerate every row from the current torrents, in sort order.
    pub fn rebuild(&mut self, data: &StoreData) {
        let keep = self.selected_hash().map(str::to_string);
        self.rows.rebuild(
            self.sort
                .sorted(&data.torrents)
                .into_iter()
                .map(TorrentRow::from_entity),
        );

        let len = self.rows.rows().len();
        let cursor = if len == 0 {
            None
        } else {
            keep.and_then(|h| self.rows.rows().iter().position(|r| r.hash == h))
                .or_else(|| self.table_state.selected().map(|prev| prev.min(len - 1)))
                .or(Some(0))
        };
        self.table_state.select(cursor);
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.rows.rows().len();
        if len == 0 {
            return;
        }
        let cur = self.table_state.selected().unwrap_or(0) as isize;
        let next = (cur + delta).clamp(0, len as isize - 1) as usize;
        self.table_state.select(Some(next));
    }
}

impl Component for TorrentTable {
    fn id(&self) -> ComponentId {
        ComponentId::TorrentTable
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(10),
            KeyCode::PageUp => self.move_cursor(-10),
            KeyCode::Char('g') | KeyCode::Home => self.move_cursor(isize::MIN / 2),
            KeyCode::Char('G') | KeyCode::End => self.move_cursor(isize::MAX / 2),
            KeyCode::Char('s') => {
                self.sort.toggle(self.sort.field.next());
                self.rebuild(state.data);
            }
            KeyCode::Char('S') => {
                self.sort.toggle(self.sort.field);
                self.rebuild(state.data);
            }
            KeyCode::Enter => {
                if let Some(hash) = self.selected_hash() {
                    return vec![Action::Navigate(View::MovieDetail(hash.to_string()))];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let badge = Badge {
            text: format!(
                "{} · {} {}",
                self.rows.rows().len(),
                self.sort.field.as_str(),
                self.sort.direction.arrow()
            ),
            color: C_SECONDARY,
        };
        let block = pane_chrome("torrents", None, focused, Some(badge));

        let header_cell = |label: &'static str, field: SortField| {
            let text = if self.sort.field == field {
                format!("{} {}", label, self.sort.direction.arrow())
            } else {
                label.to_string()
            };
            Cell::from(text)
        };
        let header = Row::new(vec![
            header_cell("Name", SortField::Name),
            header_cell("Status", SortField::Status),
            header_cell("Progress", SortField::Progress),
            header_cell("Size", SortField::Size),
            header_cell("Ratio", SortField::Ratio),
            header_cell("Added", SortField::AddedOn),
            header_cell("Completed", SortField::CompletionOn),
        ])
        .style(style_muted().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .rows
            .rows()
            .iter()
            .map(|r| {
                let name = match &r.message {
                    Some(msg) if r.status.is_none() => Line::from(vec![
                        Span::styled(r.name.clone(), style_default()),
                        Span::styled(format!("  ({})", msg), style_muted()),
                    ]),
                    _ => Line::from(Span::styled(r.name.clone(), style_default())),
                };
                Row::new(vec![
                    Cell::from(name),
                    Cell::from(Span::styled(r.status_text(), style_badge(r.status))),
                    Cell::from(Span::styled(
                        format!("{} {:>3.0}%", bar_string(r.progress, 8), r.progress * 100.0),
                        style_secondary(),
                    )),
                    Cell::from(fmt_size(r.size)),
                    Cell::from(format!("{:.2}", r.ratio)),
                    Cell::from(fmt_timestamp(r.added_on)),
                    Cell::from(fmt_timestamp(r.completion_on)),
                ])
            })
            .collect();

        let highlight = if focused {
            style_selected_focused()
        } else {
            style_selected()
        };
        let table = Table::new(
            rows,
            [
                Constraint::Min(24),
                Constraint::Length(26),
                Constraint::Length(14),
                Constraint::Length(10),
                Constraint::Length(6),
                Constraint::Length(16),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(highlight);

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}
