//! IdentifyPrompt: one-line popup asking for the TMDB id of a movie.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::help_overlay::centered_rect,
    theme::{C_ACCENT, C_FILTER_BG, C_FILTER_FG, C_MUTED, C_PANEL_BORDER_FOCUSED, C_POPUP_BG},
    widgets::toast::Severity,
};

pub struct IdentifyPrompt {
    /// Movie being identified; `None` while closed.
    target: Option<String>,
    input: Input,
}

impl IdentifyPrompt {
    pub fn new() -> Self {
        Self {
            target: None,
            input: Input::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn open(&mut self, id: String) {
        self.target = Some(id);
        self.input = Input::default();
    }

    pub fn close(&mut self) {
        self.target = None;
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    fn submit(&mut self) -> Vec<Action> {
        let value = self.input.value().trim();
        if value.is_empty() {
            self.close();
            return vec![];
        }
        match value.parse::<u64>() {
            Ok(tmdb_id) if tmdb_id > 0 => match self.target.take() {
                Some(id) => vec![Action::Identify { id, tmdb_id }],
                None => vec![],
            },
            _ => vec![Action::Notify(
                Severity::Warning,
                "TMDB ID must be a number".to_string(),
            )],
        }
    }
}

impl Default for IdentifyPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for IdentifyPrompt {
    fn id(&self) -> ComponentId {
        ComponentId::IdentifyPrompt
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.is_open() {
            return vec![];
        }
        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Enter => return self.submit(),
            _ => {
                self.input.handle_event(&Event::Key(key));
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.is_open() {
            return;
        }
        let popup = centered_rect(50, 6, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
            .style(Style::default().bg(C_POPUP_BG));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        if inner.height < 4 {
            return;
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " TMDB id for this movie (e.g. 550)",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ))),
            Rect { height: 1, ..inner },
        );

        let field = Rect {
            y: inner.y + 2,
            height: 1,
            ..inner
        };
        let width = field.width.saturating_sub(3) as usize;
        let scroll = self.input.visual_scroll(width);
        let value = self.input.value();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" > {}", value.chars().skip(scroll).collect::<String>()),
                Style::default().fg(C_FILTER_FG),
            )))
            .style(Style::default().bg(C_FILTER_BG)),
            field,
        );
        let cursor_x = field.x + 3 + (self.input.visual_cursor() - scroll) as u16;
        frame.set_cursor_position((cursor_x.min(field.x + field.width - 1), field.y));

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " enter identify · esc cancel",
                Style::default().fg(C_MUTED),
            ))),
            Rect {
                y: inner.y + 3,
                height: 1,
                ..inner
            },
        );
    }
}
