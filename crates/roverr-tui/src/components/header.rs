//! Header: single top row.
//!
//! Left: app name, backend, connection dot, poll cadence.
//! Right: ignored-series count and the RSS countdown.
//!
//! Not focusable.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use roverr_proto::protocol::RssStatus;

use crate::app_state::AppState;
use crate::theme::{C_ACCENT, C_MUTED, C_OK, C_PRIMARY, C_SECONDARY, C_TAG, C_WAITING};

/// Countdown label with the time since the status was fetched taken off.
pub fn rss_label(rss: &RssStatus, fetched_at: Option<Instant>, now: Instant) -> Option<String> {
    let elapsed = fetched_at.map_or(0, |t| now.saturating_duration_since(t).as_secs() as i64);
    let remaining = RssStatus {
        countdown_seconds: if rss.countdown_seconds < 0 {
            rss.countdown_seconds
        } else {
            (rss.countdown_seconds - elapsed).max(0)
        },
        ..rss.clone()
    };
    remaining.countdown_label()
}

pub fn ignored_label(count: usize) -> Option<String> {
    (count > 0).then(|| format!("{} Series Ignored", count))
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let sync = state.sync;
    let (dot, dot_color) = if sync.connected {
        ("●", C_OK)
    } else {
        ("○", C_ACCENT)
    };

    let mut left = vec![
        Span::styled(
            " roverr ",
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::styled(format!(" {} ", sync.base_url), Style::default().fg(C_SECONDARY)),
        Span::styled(format!("[{}]", sync.cadence_label()), Style::default().fg(C_MUTED)),
    ];
    if let Some(err) = sync.last_error.as_deref().filter(|_| !sync.connected) {
        left.push(Span::styled(format!("  {}", err), Style::default().fg(C_ACCENT)));
    }

    let mut right = Vec::new();
    if let Some(ignored) = ignored_label(state.data.ignored_series.len()) {
        right.push(Span::styled(ignored, Style::default().fg(C_WAITING)));
    }
    if let Some(rss) = state
        .data
        .rss
        .as_ref()
        .and_then(|r| rss_label(r, sync.rss_fetched_at, Instant::now()))
    {
        if !right.is_empty() {
            right.push(Span::styled("  │  ", Style::default().fg(C_MUTED)));
        }
        right.push(Span::styled(rss, Style::default().fg(C_TAG)));
    }
    right.push(Span::raw(" "));

    frame.render_widget(Paragraph::new(Line::from(left)), area);
    frame.render_widget(
        Paragraph::new(Line::from(right).right_aligned()),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn rss(countdown: i64) -> RssStatus {
        RssStatus {
            has_feeds: true,
            countdown_seconds: countdown,
            next_feed_name: Some("YTS".into()),
            next_feed_url: None,
        }
    }

    #[test]
    fn test_rss_countdown_runs_down_locally() {
        let fetched = Instant::now();
        let later = fetched + Duration::from_secs(5);
        assert_eq!(
            rss_label(&rss(65), Some(fetched), later).as_deref(),
            Some("Next RSS: YTS in 01:00")
        );
        assert_eq!(
            rss_label(&rss(3), Some(fetched), later).as_deref(),
            Some("Next RSS: YTS in 00:00")
        );
        assert_eq!(rss_label(&rss(-1), Some(fetched), later), None);
    }

    #[test]
    fn test_ignored_series_label() {
        assert_eq!(ignored_label(0), None);
        assert_eq!(ignored_label(2).as_deref(), Some("2 Series Ignored"));
    }
}
