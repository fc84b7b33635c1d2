//! MovieGrid: poster cards for every movie, kept alive across polls.
//!
//! Cards are reconciled by id: a poll that changes one movie's progress
//! patches that card's progress and nothing else.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use roverr_proto::protocol::Status;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    sync::reconcile::{CardFields, CardView, FieldPatch, ImageRef, KeyedReconciler, ReconcileReport},
    sync::selection::SelectionSnapshot,
    sync::store::{StoreData, View},
    theme::{
        status_color, status_label, style_badge, style_muted, style_secondary, C_MARKED_BG,
        C_PRIMARY, C_SECONDARY, C_SELECTION_BG, C_TAG,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
    widgets::progress_bar::bar_string,
};

const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub id: String,
    pub title: String,
    pub image: ImageRef,
    pub status: Option<Status>,
    pub progress: f64,
}

impl CardView for MovieCard {
    fn build(id: &str, fields: &CardFields) -> Self {
        Self {
            id: id.to_string(),
            title: fields.title.clone(),
            image: fields.image.clone(),
            status: fields.status,
            progress: fields.progress,
        }
    }

    fn patch(&mut self, patch: &FieldPatch) {
        match patch {
            FieldPatch::Title(t) => self.title = t.clone(),
            FieldPatch::Image(i) => self.image = i.clone(),
            FieldPatch::Status(s) => self.status = *s,
            FieldPatch::Progress(p) => self.progress = *p,
        }
    }
}

impl MovieCard {
    /// Freeze what the card shows right now.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            status: self.status,
        }
    }
}

pub struct MovieGrid {
    cards: KeyedReconciler<MovieCard>,
    cursor: usize,
    /// Columns at the last draw; j/k move by a whole row.
    columns: usize,
    scroll_row: usize,
}

impl MovieGrid {
    pub fn new() -> Self {
        Self {
            cards: KeyedReconciler::new(),
            cursor: 0,
            columns: 1,
            scroll_row: 0,
        }
    }

    /// Reconcile cards against the latest movie list.
    pub fn sync(&mut self, data: &StoreData) -> ReconcileReport {
        let items: Vec<(String, CardFields)> = data
            .movies
            .iter()
            .map(|m| (m.id().to_string(), CardFields::from_movie(m)))
            .collect();
        let report = self.cards.reconcile(&items);
        if !report.is_noop() {
            debug!(
                "[grid] +{} -{} ~{} ({} field writes)",
                report.created.len(),
                report.removed.len(),
                report.updated.len(),
                report.patches
            );
        }
        self.cursor = self.cursor.min(self.cards.len().saturating_sub(1));
        report
    }

    pub fn card(&self, id: &str) -> Option<&MovieCard> {
        self.cards.get(id)
    }

    pub fn current(&self) -> Option<&MovieCard> {
        self.cards
            .ids()
            .get(self.cursor)
            .and_then(|id| self.cards.get(id))
    }

    pub fn snapshots(&self) -> Vec<SelectionSnapshot> {
        self.cards.views().map(|(_, c)| c.snapshot()).collect()
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        let next = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = next as usize;
    }

    fn ensure_visible(&mut self, visible_rows: usize) {
        let row = self.cursor / self.columns.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if visible_rows > 0 && row >= self.scroll_row + visible_rows {
            self.scroll_row = row + 1 - visible_rows;
        }
    }
}

impl Default for MovieGrid {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            out.push('…');
            return out;
        }
        used += w;
        out.push(ch);
    }
    out
}

fn card_lines(card: &MovieCard, year: Option<String>, marked: bool, width: usize) -> Vec<Line<'static>> {
    let mark = if marked { "[x] " } else { "[ ] " };
    let title = truncate(&card.title, width.saturating_sub(mark.len()));
    let image = match card.image {
        ImageRef::Poster(_) => Span::styled("▣ poster", Style::default().fg(C_TAG)),
        ImageRef::Placeholder => Span::styled("□ no poster", style_muted()),
    };
    let progress = if card.status.is_some_and(Status::is_in_progress) || card.progress < 1.0 {
        Line::from(Span::styled(
            format!(
                "{} {:>3.0}%",
                bar_string(card.progress, width.saturating_sub(6)),
                card.progress * 100.0
            ),
            Style::default().fg(status_color(card.status)),
        ))
    } else {
        Line::from("")
    };

    vec![
        Line::from(vec![
            Span::styled(mark, Style::default().fg(C_SECONDARY)),
            Span::styled(title, Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(year.unwrap_or_default(), style_secondary()),
            Span::raw("  "),
            image,
        ]),
        Line::from(Span::styled(status_label(card.status), style_badge(card.status))),
        progress,
    ]
}

impl Component for MovieGrid {
    fn id(&self) -> ComponentId {
        ComponentId::MovieGrid
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let cols = self.columns.max(1) as isize;
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
            KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(cols),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-cols),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => self.cursor = self.cards.len().saturating_sub(1),
            KeyCode::Char(' ') => {
                if let Some(card) = self.current() {
                    return vec![Action::ToggleSelect(card.snapshot())];
                }
            }
            KeyCode::Char('a') => return vec![Action::SelectAll(self.snapshots())],
            KeyCode::Char('A') => return vec![Action::ClearSelection],
            KeyCode::Enter => {
                if let Some(card) = self.current() {
                    return vec![Action::Navigate(View::MovieDetail(card.id.clone()))];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let selection = &state.data.selection;
        let badge = Badge {
            text: if selection.is_empty() {
                format!("{}", self.cards.len())
            } else {
                format!("{} · {} marked", self.cards.len(), selection.len())
            },
            color: C_SECONDARY,
        };
        let block = pane_chrome("movies", None, focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.cards.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(" no movies yet", style_muted()))),
                inner,
            );
            return;
        }

        self.columns = (inner.width / CARD_WIDTH).max(1) as usize;
        let visible_rows = (inner.height / CARD_HEIGHT) as usize;
        self.ensure_visible(visible_rows.max(1));

        let card_w = (inner.width / self.columns as u16).max(1);
        let start = self.scroll_row * self.columns;
        for (slot, (id, card)) in self
            .cards
            .views()
            .skip(start)
            .take(self.columns * visible_rows.max(1))
            .enumerate()
        {
            let col = (slot % self.columns) as u16;
            let row = (slot / self.columns) as u16;
            let rect = Rect {
                x: inner.x + col * card_w,
                y: inner.y + row * CARD_HEIGHT,
                width: card_w.saturating_sub(1),
                height: (CARD_HEIGHT - 1).min(inner.height.saturating_sub(row * CARD_HEIGHT)),
            };
            if rect.height == 0 {
                break;
            }

            let year = state
                .data
                .movie(id)
                .and_then(|m| m.valid())
                .and_then(|m| m.year.as_ref())
                .map(|y| y.to_string());
            let marked = selection.contains(id);
            let lines = card_lines(card, year, marked, rect.width as usize);

            let mut style = Style::default();
            if marked {
                style = style.bg(C_MARKED_BG);
            }
            if focused && start + slot == self.cursor {
                style = style.bg(C_SELECTION_BG).add_modifier(Modifier::REVERSED);
            }
            frame.render_widget(Paragraph::new(lines).style(style), rect);
        }
    }
}
