//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_duration;

const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the header bar with the ingestion overview.
///
/// Displays: source state, record count, sick share, arrival rate.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.source_status();
    let data = &app.data;

    let rate = app
        .history
        .rate()
        .map(|r| format!("{:.1}/s", r))
        .unwrap_or_else(|| "-/s".to_string());

    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(&status)),
        Span::styled("HEALTHWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format_count(data.record_count as u64),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" records │ "),
        Span::styled(
            format!("{:.1}%", data.sick_percent()),
            Style::default().fg(app.theme.sick),
        ),
        Span::raw(format!(" {} │ ", app.labels().sick.to_lowercase())),
        Span::raw(rate),
        Span::raw(" "),
        Span::styled(
            render_sparkline(&app.history.sparkline()),
            Style::default().fg(app.theme.highlight),
        ),
    ];

    if let Some(capacity) = app.buffer.capacity() {
        spans.push(Span::raw(format!(" │ cap {}", format_count(capacity as u64))));
        let evicted = app.buffer.evicted();
        if evicted > 0 {
            spans.push(Span::raw(format!(" ({} evicted)", format_count(evicted))));
        }
    }
    spans.push(Span::raw(format!(" │ {}", app.language.code())));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string();
    }

    // Take last 8 values
    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();

    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

fn tab_title(view: View) -> String {
    format!("{}:{}", view.index() + 1, view.label())
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(tab_title(*v))).collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// View whose tab covers `column` in the tab bar.
///
/// Each tab is its title with one column of padding on both sides, and tabs
/// are separated by a one-column divider.
pub fn view_at_column(column: u16) -> Option<View> {
    let mut start = 0u16;
    for view in View::ALL {
        let width = tab_title(view).chars().count() as u16 + 2;
        if column < start + width {
            return Some(view);
        }
        start += width + 1;
        if column < start {
            // On the divider
            return None;
        }
    }
    None
}

/// Render the status bar at the bottom.
///
/// Shows: source status, time since the last record, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = app.source_status();
    let last = match app.last_record_at {
        Some(at) => format!("last record {} ago", format_duration(at.elapsed())),
        None => "waiting for records".to_string(),
    };

    let controls = match app.current_view {
        View::Overview | View::Heatmap => "f/g:symptom o:location +/-:zoom L:lang ?:help q:quit",
        View::Age | View::Gender | View::Distance => "Tab:switch L:lang e:export ?:help q:quit",
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", status), app.theme.status_style(&status)),
        Span::styled(
            format!("| {} | {} | {}", app.source_description(), last, controls),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  1-5         Jump to view"),
        Line::from("  ←/→ Tab     Switch views"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Maps",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  f / F       Left map symptom"),
        Line::from("  g / G       Right map symptom"),
        Line::from("  o           Next location"),
        Line::from("  + / -       Zoom (or scroll)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  L           Cycle language"),
        Line::from("  r           Poll source now"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn test_sparkline_keeps_last_eight() {
        assert_eq!(render_sparkline(&[]), "        ");
        assert_eq!(render_sparkline(&[0, 1, 2, 3, 4, 5, 6, 7, 7]), "▂▃▄▅▆▇██");
    }

    #[test]
    fn test_view_at_column() {
        // " 1:Overview |  2:Heatmap | ..."
        assert_eq!(view_at_column(0), Some(View::Overview));
        assert_eq!(view_at_column(11), Some(View::Overview));
        assert_eq!(view_at_column(12), None);
        assert_eq!(view_at_column(13), Some(View::Heatmap));
        assert_eq!(view_at_column(500), None);
    }
}
