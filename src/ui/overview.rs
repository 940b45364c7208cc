//! Overview and heatmap views.
//!
//! The overview mirrors the dashboard layout: two map panes on top and the
//! three charts below. The heatmap view gives the map panes the full area.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::app::{App, Pane};

use super::{age, distance, gender};

/// Minimum width for showing the second map pane.
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 120;

/// Panes visible at `width`.
pub fn visible_panes(width: u16) -> &'static [Pane] {
    if width >= WIDE_LAYOUT_MIN_WIDTH {
        &[Pane::Left, Pane::Right]
    } else {
        &[Pane::Left]
    }
}

/// Render the map panes side by side.
pub fn render_maps(frame: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let labels = app.labels();
    let panes = visible_panes(area.width);
    let areas = Layout::horizontal(vec![Constraint::Ratio(1, panes.len() as u32); panes.len()]).split(area);

    for (pane, pane_area) in panes.iter().zip(areas.iter()) {
        let slot = app.pane(*pane);
        let title = Line::from(vec![
            Span::raw(format!(" {}: ", labels.symptoms)),
            Span::styled(
                labels.filter(&slot.filter).to_string(),
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" · {} · {} ", slot.map.points().len(), app.location().name)),
        ]);
        slot.map.render(frame, *pane_area, title, &app.theme, now);
    }
}

/// Render the overview layout.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [maps_area, charts_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);

    render_maps(frame, app, maps_area);

    let [age_area, gender_area, distance_area] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(charts_area);

    age::render(frame, app, age_area);
    gender::render(frame, app, gender_area);
    distance::render(frame, app, distance_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_pane_needs_wide_terminal() {
        assert_eq!(visible_panes(80), &[Pane::Left]);
        assert_eq!(visible_panes(119), &[Pane::Left]);
        assert_eq!(visible_panes(120), &[Pane::Left, Pane::Right]);
    }
}
