//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`overview`]: Maps on top and the three charts below; also the full-size map view
//! - [`map`]: [`MapView`], the heatmap pane with its viewport animation and heat layer
//! - [`age`]: Grouped bar chart of sick/not-sick counts per age bucket
//! - [`gender`]: Pie chart of the four sex/sickness slices
//! - [`distance`]: Distance metrics over the reference Gaussian
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`labels`]: Display strings for English, Japanese and Arabic
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the current view:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (overview/age/gender/distance)       │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod age;
pub mod common;
pub mod distance;
pub mod gender;
pub mod labels;
pub mod map;
pub mod overview;
pub mod theme;

pub use common::view_at_column;
pub use labels::Language;
pub use map::MapView;
pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 16;

/// Row of the tab bar, for mouse hit-testing.
pub const TABS_ROW: u16 = 1;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5u16.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Overview => overview::render(frame, app, chunks[2]),
        View::Heatmap => overview::render_maps(frame, app, chunks[2]),
        View::Age => age::render(frame, app, chunks[2]),
        View::Gender => gender::render(frame, app, chunks[2]),
        View::Distance => distance::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::source::ChannelSource;
    use healthwatch_types::{HealthRecord, Sex};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn app_with_records() -> App {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::with_theme(Box::new(source), &Settings::default(), Theme::dark());
        for (i, sex) in [Sex::Male, Sex::Female, Sex::Male].into_iter().enumerate() {
            tx.send(HealthRecord {
                age_group: Some(format!("{}", 20 + i * 15)),
                latitude: Some(37.3382 + i as f64 * 0.01),
                longitude: Some(-121.8863),
                sex,
                distance_metric: Some(1.0 + i as f64),
                symptoms: vec!["covid".to_string()],
            })
            .unwrap();
        }
        app.reload_data();
        app
    }

    #[test]
    fn test_every_view_renders() {
        let mut app = app_with_records();
        for view in View::ALL {
            app.set_view(view);
            let screen = render_to_string(&app, 140, 40);
            assert!(screen.contains("HEALTHWATCH"));
            assert!(screen.contains("1:Overview"));
        }
    }

    #[test]
    fn test_chart_titles_follow_language() {
        let mut app = app_with_records();
        app.set_view(View::Age);
        assert!(render_to_string(&app, 100, 30).contains("Age"));
        app.cycle_language();
        // Wide characters occupy two cells; the first one carries the symbol
        assert!(render_to_string(&app, 100, 30).contains("年"));
    }

    #[test]
    fn test_header_reports_evictions() {
        let settings = Settings {
            buffer_capacity: Some(2),
            ..Settings::default()
        };
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::with_theme(Box::new(source), &settings, Theme::dark());
        for i in 0..3 {
            tx.send(HealthRecord {
                age_group: Some("40".to_string()),
                latitude: None,
                longitude: None,
                sex: Sex::Female,
                distance_metric: Some(i as f64),
                symptoms: Vec::new(),
            })
            .unwrap();
        }
        app.reload_data();

        let screen = render_to_string(&app, 140, 40);
        assert!(screen.contains("cap 2 (1 evicted)"));
    }

    #[test]
    fn test_rtl_legend_is_right_aligned() {
        let mut app = app_with_records();
        app.set_view(View::Age);
        // Column of the first legend swatch
        let swatch = |app: &App| {
            let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
            terminal.draw(|frame| draw(frame, app)).unwrap();
            let buffer = terminal.backend().buffer().clone();
            let area = buffer.area;
            (area.top()..area.bottom())
                .flat_map(|y| (area.left()..area.right()).map(move |x| (x, y)))
                .find(|&(x, y)| buffer[(x, y)].symbol() == "■")
                .map(|(x, _)| x)
                .unwrap()
        };
        let left = swatch(&app);

        while !app.language.is_rtl() {
            app.cycle_language();
        }
        let right = swatch(&app);

        assert!(right > left);
    }

    #[test]
    fn test_small_terminal_message() {
        let app = app_with_records();
        let screen = render_to_string(&app, 40, 10);
        assert!(screen.contains("Terminal too small"));
    }

    #[test]
    fn test_empty_dashboard_renders() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::with_theme(Box::new(source), &Settings::default(), Theme::dark());
        app.set_view(View::Gender);
        let screen = render_to_string(&app, 100, 30);
        assert!(screen.contains("No classified records"));
    }
}
