//! Smooth Unicode progress bar widget.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_SECONDARY};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// A `width`-cell bar filled to `fraction` (0..=1) in eighths of a cell.
pub fn bar_string(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let eighths = (fraction * width as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

/// `12.3 MB/s`
pub fn fmt_speed(mb_per_sec: f64) -> String {
    format!("{:.1} MB/s", mb_per_sec)
}

/// Render `percent` (0..=100) with the percentage on the left and an
/// optional transfer speed on the right.
pub fn draw_progress(
    frame: &mut Frame,
    area: Rect,
    percent: f64,
    speed: Option<f64>,
    color: Color,
) {
    if area.width < 4 || area.height == 0 {
        return;
    }

    let left_label = format!("{:>5.1}%", percent);
    let right_label = speed.map(fmt_speed).unwrap_or_default();
    let label_w = (left_label.len() + right_label.len() + 2) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;

    let mut spans = vec![
        Span::styled(format!("{} ", left_label), Style::default().fg(C_SECONDARY)),
        Span::styled(bar_string(percent / 100.0, bar_w), Style::default().fg(color)),
    ];
    if !right_label.is_empty() {
        spans.push(Span::styled(
            format!(" {}", right_label),
            Style::default().fg(C_MUTED),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar_string(0.0, 4), "    ");
        assert_eq!(bar_string(1.0, 4), "████");
        assert_eq!(bar_string(0.5, 4), "██  ");
        assert_eq!(bar_string(f64::NAN, 2), "  ");
        assert_eq!(bar_string(0.5, 4).chars().count(), 4);
    }

    #[test]
    fn test_speed_label() {
        assert_eq!(fmt_speed(80.46), "80.5 MB/s");
    }
}
