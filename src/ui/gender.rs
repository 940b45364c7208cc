//! Gender view: pie chart of sex and sickness shares.

use std::f64::consts::TAU;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::app::App;
use crate::data::GenderSlice;

/// Index of the slice covering `fraction` of a full turn, given slice
/// values in display order. Zero-valued slices never match.
pub fn slice_at(fraction: f64, values: &[f64]) -> Option<usize> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let target = fraction.clamp(0.0, 1.0) * total;
    let mut acc = 0.0;
    for (i, value) in values.iter().enumerate() {
        acc += value;
        if target < acc {
            return Some(i);
        }
    }
    values.iter().rposition(|v| *v > 0.0)
}

/// Dot positions inside the unit disc, grouped by slice.
///
/// Slices start at twelve o'clock and run clockwise. `cols` x `rows` is the
/// sampling grid over `[-rx, rx] x [-1, 1]`.
fn pie_points(values: &[f64], cols: u16, rows: u16, rx: f64) -> Vec<Vec<(f64, f64)>> {
    let mut slices = vec![Vec::new(); values.len()];
    if cols == 0 || rows == 0 {
        return slices;
    }

    for row in 0..rows {
        let y = 1.0 - 2.0 * (row as f64 + 0.5) / rows as f64;
        for col in 0..cols {
            let x = rx * (2.0 * (col as f64 + 0.5) / cols as f64 - 1.0);
            if x * x + y * y > 1.0 {
                continue;
            }
            // Clockwise from twelve o'clock
            let angle = x.atan2(y).rem_euclid(TAU);
            if let Some(i) = slice_at(angle / TAU, values) {
                slices[i].push((x, y));
            }
        }
    }
    slices
}

/// Render the pie and its legend into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.labels();
    let theme = &app.theme;
    let gender = &app.data.gender;

    let block = Block::default()
        .title(format!(" {} ", labels.gender_title))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let legend_height = GenderSlice::ALL.len() as u16;
    let [pie_area, legend_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(legend_height)]).areas(inner);

    let entries = gender.entries();
    let values: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();

    // Braille cells hold 2x4 dots and are about twice as tall as wide
    let rx = if pie_area.height == 0 {
        1.0
    } else {
        (pie_area.width as f64 / (pie_area.height as f64 * 2.0)).max(1.0)
    };

    if gender.is_empty() {
        let empty = Paragraph::new("No classified records")
            .style(Style::default().add_modifier(Modifier::DIM))
            .centered();
        frame.render_widget(empty, pie_area);
    } else {
        let slices = pie_points(&values, pie_area.width * 2, pie_area.height * 4, rx);
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-rx, rx])
            .y_bounds([-1.0, 1.0])
            .paint(|ctx| {
                for ((slice, _), coords) in entries.iter().zip(&slices) {
                    ctx.draw(&Points {
                        coords: coords.as_slice(),
                        color: theme.pie_color(*slice),
                    });
                }
            });
        frame.render_widget(canvas, pie_area);
    }

    let legend: Vec<Line> = entries
        .iter()
        .map(|(slice, value)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(theme.pie_color(*slice))),
                Span::raw(format!("{:<18}", labels.gender_slice(*slice))),
                Span::styled(format!("{:>6.1}%", value), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(legend).alignment(app.language.alignment()),
        legend_area,
    );
}
