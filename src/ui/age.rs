//! Age view: sick and not-sick counts per age bucket.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

const GROUP_GAP: u16 = 2;
const BAR_GAP: u16 = 0;

/// Width of each bar so seven groups of two fill `width`.
fn bar_width(width: u16, groups: u16) -> u16 {
    let per_group = width / groups.max(1);
    (per_group.saturating_sub(GROUP_GAP + BAR_GAP) / 2).max(1)
}

/// Render the grouped age chart into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.labels();
    let theme = &app.theme;

    let block = Block::default()
        .title(format!(" {} ", labels.age_title))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [legend_area, chart_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(inner);

    let legend = Line::from(vec![
        Span::styled("■ ", Style::default().fg(theme.sick)),
        Span::raw(labels.sick),
        Span::raw("  "),
        Span::styled("■ ", Style::default().fg(theme.not_sick)),
        Span::raw(labels.not_sick),
    ]);
    frame.render_widget(
        Paragraph::new(legend).alignment(app.language.alignment()),
        legend_area,
    );

    let buckets = &app.data.age.buckets;
    let width = bar_width(chart_area.width, buckets.len() as u16);

    let mut chart = BarChart::default()
        .bar_width(width)
        .bar_gap(BAR_GAP)
        .group_gap(GROUP_GAP)
        .max(app.data.age.max_count().max(1));

    for count in buckets {
        let bars = [
            Bar::default()
                .value(count.sick)
                .style(Style::default().fg(theme.sick))
                .value_style(Style::default().fg(theme.sick).reversed()),
            Bar::default()
                .value(count.not_sick)
                .style(Style::default().fg(theme.not_sick))
                .value_style(Style::default().fg(theme.not_sick).reversed()),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(count.bucket.label()).centered())
                .bars(&bars),
        );
    }

    frame.render_widget(chart, chart_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width() {
        // 7 groups in 100 columns: 14 per group, 2 gap, 6 per bar
        assert_eq!(bar_width(100, 7), 6);
        assert_eq!(bar_width(10, 7), 1);
        assert_eq!(bar_width(0, 7), 1);
    }
}
