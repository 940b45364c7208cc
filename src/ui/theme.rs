//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::GenderSlice;
use crate::source::SourceStatus;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warnings such as a reconnecting source.
    pub warning: Color,
    /// Color for errors and closed sources.
    pub critical: Color,
    /// Color for a connected source.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Terminal background, used to fade density markers.
    pub background: (u8, u8, u8),
    /// Bar color for sick counts.
    pub sick: Color,
    /// Bar color for not-sick counts.
    pub not_sick: Color,
    /// Pie slice colors, in [`GenderSlice::ALL`] order.
    pub pie: [Color; 4],
    /// Reference curve on the distance chart.
    pub curve: Color,
    /// Sample markers at full opacity.
    pub marker: (u8, u8, u8),
    /// World outline on the map.
    pub map_outline: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

const PIE: [Color; 4] = [
    Color::Rgb(0xFF, 0x6B, 0x6B),
    Color::Rgb(0x4E, 0xCD, 0xC4),
    Color::Rgb(0x1A, 0x53, 0x5C),
    Color::Rgb(0xB5, 0x65, 0xA7),
];

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            background: (0, 0, 0),
            sick: Color::Rgb(0xFF, 0x6B, 0x6B),
            not_sick: Color::Rgb(0x4E, 0xCD, 0xC4),
            pie: PIE,
            curve: Color::Rgb(0x4B, 0xC0, 0xC0),
            marker: (0xFF, 0x56, 0x32),
            map_outline: Color::DarkGray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            background: (255, 255, 255),
            sick: Color::Rgb(0xFF, 0x6B, 0x6B),
            not_sick: Color::Rgb(0x4E, 0xCD, 0xC4),
            pie: PIE,
            curve: Color::Rgb(0x2A, 0x8A, 0x8A),
            marker: (0xFF, 0x56, 0x32),
            map_outline: Color::Gray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a source status
    pub fn status_style(&self, status: &SourceStatus) -> Style {
        match status {
            SourceStatus::Connected | SourceStatus::Idle => Style::default().fg(self.healthy),
            SourceStatus::Connecting | SourceStatus::Reconnecting { .. } => {
                Style::default().fg(self.warning)
            }
            SourceStatus::Error(_) | SourceStatus::Closed(_) => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    pub fn pie_color(&self, slice: GenderSlice) -> Color {
        match slice {
            GenderSlice::SickMale => self.pie[0],
            GenderSlice::NotSickMale => self.pie[1],
            GenderSlice::SickFemale => self.pie[2],
            GenderSlice::NotSickFemale => self.pie[3],
        }
    }

    /// Marker color at `opacity`, blended toward the background.
    pub fn marker_color(&self, opacity: f64) -> Color {
        blend(self.marker, self.background, opacity)
    }
}

/// Mix `fg` over `bg` with alpha `opacity` in `[0, 1]`.
pub fn blend(fg: (u8, u8, u8), bg: (u8, u8, u8), opacity: f64) -> Color {
    let a = opacity.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f as f64 * a + b as f64 * (1.0 - a)).round() as u8;
    Color::Rgb(mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_extremes() {
        let fg = (200, 100, 50);
        assert_eq!(blend(fg, (0, 0, 0), 1.0), Color::Rgb(200, 100, 50));
        assert_eq!(blend(fg, (0, 0, 0), 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(blend(fg, (0, 0, 0), 0.5), Color::Rgb(100, 50, 25));
    }

    #[test]
    fn test_pie_colors_are_distinct() {
        let theme = Theme::dark();
        let colors: Vec<Color> = GenderSlice::ALL.iter().map(|s| theme.pie_color(*s)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_status_styles() {
        let theme = Theme::dark();
        assert_eq!(theme.status_style(&SourceStatus::Connected).fg, Some(theme.healthy));
        assert_eq!(
            theme.status_style(&SourceStatus::Closed("eof".into())).fg,
            Some(theme.critical)
        );
    }
}
