//! Status bar: bottom line with the active view and its keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::sync::store::View;
use crate::theme::{C_MUTED, C_PRIMARY, C_SECONDARY, C_SEPARATOR};

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn keys_for(view: &View) -> &'static str {
    match view {
        View::Dashboard => {
            " jk move  Tab pane  Enter open  Space mark  a/A all/none  c copy  d delete  s/S sort  r refresh  t check  f rss  ? help  q quit"
        }
        View::MovieDetail(_) => {
            " m move  x stop copy  M mark moved  d delete  i identify  Esc back  r refresh  ? help  q quit"
        }
        View::Settings => " jk move  Enter toggle  Esc back  ? help  q quit",
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, view: &View, selected: usize) {
    let mut spans = vec![Span::styled(
        format!(" {} ", view.label().to_uppercase()),
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
    )];
    if selected > 0 {
        spans.push(Span::styled(
            format!("{} marked ", selected),
            Style::default().fg(C_SECONDARY),
        ));
    }
    spans.push(Span::styled(keys_for(view), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
