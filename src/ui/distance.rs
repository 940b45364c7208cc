//! Distance view: samples against the reference distribution.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition},
    Frame,
};

use crate::app::App;
use crate::data::density::{axis_ticks, bell_curve};

fn tick_labels(ticks: [f64; 5], precision: usize) -> Vec<String> {
    ticks.iter().map(|t| format!("{:.*}", precision, t)).collect()
}

/// Render the density chart into `area`.
///
/// The curve is drawn first, then one vertical line per sample in arrival
/// order, so the most recent marker ends up on top.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.labels();
    let theme = &app.theme;

    let curve = bell_curve(&app.density);
    let (x_min, x_max) = app.density.domain();
    let peak = curve.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let marker_lines: Vec<[(f64, f64); 2]> = app
        .data
        .markers
        .iter()
        .map(|m| [(m.x, 0.0), (m.x, m.y)])
        .collect();

    let mut datasets = vec![Dataset::default()
        .name(labels.probability)
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.curve))
        .data(&curve)];

    datasets.extend(app.data.markers.iter().zip(&marker_lines).map(|(marker, line)| {
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.marker_color(marker.opacity)))
            .data(line)
    }));

    let title = format!(
        " {} ({}: {}) ",
        labels.distance_title,
        labels.distance_axis,
        app.data.distance_samples.len()
    );

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border)),
        )
        .x_axis(
            Axis::default()
                .title(labels.distance_axis)
                .style(Style::default().fg(theme.border))
                .bounds([x_min, x_max])
                .labels(tick_labels(axis_ticks(x_min, x_max), 1)),
        )
        .y_axis(
            Axis::default()
                .title(labels.density_axis)
                .style(Style::default().fg(theme.border))
                .bounds([0.0, y_max])
                .labels(tick_labels(axis_ticks(0.0, y_max), 2)),
        )
        .legend_position(Some(LegendPosition::TopRight));

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_labels() {
        let labels = tick_labels([0.0, 0.25, 0.5, 0.75, 1.0], 2);
        assert_eq!(labels, vec!["0.00", "0.25", "0.50", "0.75", "1.00"]);
    }
}
