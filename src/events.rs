use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, Pane, View};
use crate::ui::view_at_column;

/// Default file written by the export key.
pub const EXPORT_PATH: &str = "healthwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.set_view(View::ALL[index]);
        }

        // Map panes
        KeyCode::Char('f') => app.cycle_filter(Pane::Left, true),
        KeyCode::Char('F') => app.cycle_filter(Pane::Left, false),
        KeyCode::Char('g') => app.cycle_filter(Pane::Right, true),
        KeyCode::Char('G') => app.cycle_filter(Pane::Right, false),
        KeyCode::Char('o') => app.cycle_location(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        KeyCode::Char('L') => app.cycle_language(),

        // Poll now
        KeyCode::Char('r') => {
            let received = app.reload_data();
            app.set_status_message(format!("{} new records", received));
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "export failed");
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, tabs_row: u16) {
    match mouse.kind {
        // Scroll wheel zooms the maps
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),

        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row == tabs_row {
                if let Some(view) = view_at_column(mouse.column) {
                    app.set_view(view);
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::data::SymptomFilter;
    use crate::source::ChannelSource;
    use crate::ui::Theme;
    use crossterm::event::KeyEventKind;

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::with_theme(Box::new(source), &Settings::default(), Theme::dark())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_number_keys_select_views() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Age);
        handle_key_event(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.current_view, View::Distance);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Overview);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Distance);
    }

    #[test]
    fn test_filter_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('g')));
        assert_eq!(app.pane(Pane::Right).filter, SymptomFilter::tag("influenza"));
        handle_key_event(&mut app, key(KeyCode::Char('F')));
        assert_eq!(app.pane(Pane::Left).filter, SymptomFilter::tag("influenza"));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        let event = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        handle_key_event(&mut app, event);
        assert!(!app.running);
    }

    #[test]
    fn test_mouse_scroll_zooms_and_tabs_click() {
        let mut app = app();
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollUp, 0, 5), 1);
        assert_eq!(app.zoom, 11);
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollDown, 0, 5), 1);
        assert_eq!(app.zoom, 10);

        // " 1:Overview " occupies columns 0..12, then the divider, then " 2:Heatmap "
        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 14, 1), 1);
        assert_eq!(app.current_view, View::Heatmap);

        // Clicks outside the tab row are ignored
        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 1, 4), 1);
        assert_eq!(app.current_view, View::Heatmap);
    }
}
