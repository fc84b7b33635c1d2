//! MovieDetailView: one movie, full screen.
//!
//! A status change rebuilds every line; a progress tick only swaps the live
//! figures drawn in the progress row.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use roverr_proto::protocol::{LiveFields, MovieDetail, Status};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::torrent_table::fmt_size,
    theme::{
        status_color, status_label, style_badge, style_default, style_muted, style_secondary,
        C_PRIMARY, C_SECONDARY, C_TAG,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
    widgets::progress_bar::draw_progress,
};

pub struct MovieDetailView {
    id: Option<String>,
    status: Option<Status>,
    body: Vec<Line<'static>>,
    live: Option<LiveFields>,
    renders: u64,
    patches: u64,
    scroll: u16,
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        style_muted().add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), style_secondary()),
        Span::styled(value, style_default()),
    ])
}

/// `2h 1m`
pub fn fmt_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, m) => format!("{}h {}m", h, m),
    }
}

fn build_body(d: &MovieDetail) -> Vec<Line<'static>> {
    let m = &d.movie;
    let mut lines = Vec::new();

    let mut title = vec![Span::styled(
        m.title.clone(),
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
    )];
    if let Some(year) = &m.year {
        title.push(Span::styled(format!(" ({})", year), style_secondary()));
    }
    lines.push(Line::from(title));
    lines.push(Line::from(Span::styled(
        status_label(Some(m.status)),
        style_badge(Some(m.status)),
    )));
    lines.push(Line::from(""));

    if let Some(runtime) = d.runtime.filter(|r| *r > 0) {
        lines.push(field("Runtime", fmt_runtime(runtime)));
    }
    if !d.genres.is_empty() {
        lines.push(field("Genres", d.genres.join(", ")));
    }
    if let Some(avg) = d.vote_average {
        let votes = d.vote_count.map(|c| format!(" ({} votes)", c)).unwrap_or_default();
        lines.push(field("TMDB", format!("★ {:.1}{}", avg, votes)));
    }
    if let Some(rating) = &d.imdb_rating {
        let votes = d
            .imdb_votes
            .as_ref()
            .map(|v| format!(" ({} votes)", v))
            .unwrap_or_default();
        lines.push(field("IMDb", format!("★ {}{}", rating, votes)));
    }
    if m.size > 0 {
        lines.push(field("Size", fmt_size(m.size)));
    }
    if let Some(state) = m.state.as_ref().filter(|s| !s.is_empty()) {
        lines.push(field("State", state.clone()));
    }
    if let Some(src) = &d.source_path {
        lines.push(field("Source", src.clone()));
    }
    if let Some(dest) = &d.dest_path {
        lines.push(field("Destination", dest.clone()));
    }

    if let Some(overview) = m.overview.as_ref().filter(|o| !o.is_empty()) {
        lines.push(Line::from(""));
        lines.push(section("Overview"));
        lines.push(Line::from(Span::styled(overview.clone(), style_default())));
    }

    let directors: Vec<&str> = d
        .crew
        .iter()
        .filter(|c| c.job.as_deref() == Some("Director"))
        .map(|c| c.name.as_str())
        .collect();
    if !directors.is_empty() {
        lines.push(Line::from(""));
        lines.push(field("Director", directors.join(", ")));
    }

    if !d.cast.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Cast"));
        for member in d.cast.iter().take(10) {
            let mut spans = vec![Span::styled(format!("  {}", member.name), style_default())];
            if let Some(role) = member.character.as_ref().filter(|r| !r.is_empty()) {
                spans.push(Span::styled(format!(" as {}", role), style_secondary()));
            }
            lines.push(Line::from(spans));
        }
    }
    lines
}

impl MovieDetailView {
    pub fn new() -> Self {
        Self {
            id: None,
            status: None,
            body: Vec::new(),
            live: None,
            renders: 0,
            patches: 0,
            scroll: 0,
        }
    }

    /// Throw away every line and rebuild from `detail`.
    pub fn rerender(&mut self, detail: Option<&MovieDetail>) {
        self.renders += 1;
        match detail {
            Some(d) => {
                if self.id.as_deref() != Some(d.id()) {
                    self.scroll = 0;
                }
                self.id = Some(d.id().to_string());
                self.status = Some(d.status());
                self.body = build_body(d);
                self.live = d.live_fields();
            }
            None => {
                self.id = None;
                self.status = None;
                self.body.clear();
                self.live = None;
                self.scroll = 0;
            }
        }
    }

    /// Swap only the live transfer figures.
    pub fn patch(&mut self, live: Option<LiveFields>) {
        self.patches += 1;
        self.live = live;
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn patches(&self) -> u64 {
        self.patches
    }

    pub fn live(&self) -> Option<LiveFields> {
        self.live
    }

    fn shows_progress(&self) -> bool {
        self.status.is_some_and(Status::is_in_progress)
    }
}

impl Default for MovieDetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for MovieDetailView {
    fn id(&self) -> ComponentId {
        ComponentId::MovieDetail
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        let Some(id) = self.id.clone() else {
            return vec![];
        };
        match key.code {
            KeyCode::Char('m') => vec![Action::Move(id)],
            KeyCode::Char('x') => vec![Action::StopCopy(id)],
            KeyCode::Char('M') => vec![Action::MarkMoved(id)],
            KeyCode::Char('d') => vec![Action::OpenDeleteDialog(vec![id])],
            KeyCode::Char('i') => vec![Action::OpenIdentify(id)],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let badge = self.status.map(|s| Badge {
            text: status_label(Some(s)).to_string(),
            color: status_color(Some(s)),
        });
        let block = pane_chrome("movie", Some('3'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.body.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(" loading…", style_muted()))),
                inner,
            );
            return;
        }

        let body_area = if self.shows_progress() {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(0)])
                .split(inner);
            let label = match self.status {
                Some(Status::Copying) => "copying",
                _ => "downloading",
            };
            let row = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(13), Constraint::Min(0)])
                .split(parts[0]);
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", label), Style::default().fg(C_TAG))),
                row[0],
            );
            match self.live {
                Some(live) => draw_progress(
                    frame,
                    row[1],
                    live.percent,
                    Some(live.speed),
                    status_color(self.status),
                ),
                None => frame.render_widget(
                    Paragraph::new(Span::styled("waiting for progress…", Style::default().fg(C_SECONDARY))),
                    row[1],
                ),
            }
            parts[1]
        } else {
            inner
        };

        frame.render_widget(
            Paragraph::new(self.body.clone())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            body_area,
        );
    }
}
