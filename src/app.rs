//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::config::{Location, Settings};
use crate::data::{heat_points, DashboardData, DensityParams, History, RecordBuffer, SymptomFilter};
use crate::source::{RecordSource, SourceStatus};
use crate::ui::labels::{Labels, Language};
use crate::ui::map::MapView;
use crate::ui::Theme;

/// Minimum spacing between history samples.
const HISTORY_INTERVAL: Duration = Duration::from_secs(1);

const MIN_ZOOM: u8 = 1;
const MAX_ZOOM: u8 = 18;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Both maps on top, the three charts below.
    Overview,
    /// Map panes at full size.
    Heatmap,
    /// Sick / not-sick counts per age bucket.
    Age,
    /// Sex and sickness shares.
    Gender,
    /// Distance metrics against the reference distribution.
    Distance,
}

impl View {
    pub const ALL: [View; 5] = [View::Overview, View::Heatmap, View::Age, View::Gender, View::Distance];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        match self {
            View::Overview => 0,
            View::Heatmap => 1,
            View::Age => 2,
            View::Gender => 3,
            View::Distance => 4,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Heatmap => "Heatmap",
            View::Age => "Age",
            View::Gender => "Gender",
            View::Distance => "Distance",
        }
    }
}

/// Which of the two map panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Left,
    Right,
}

impl Pane {
    fn index(self) -> usize {
        match self {
            Pane::Left => 0,
            Pane::Right => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pane::Left => "Left map",
            Pane::Right => "Right map",
        }
    }
}

/// A map pane and the symptom it shows.
#[derive(Debug)]
pub struct MapPane {
    pub filter: SymptomFilter,
    pub map: MapView,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn RecordSource>,
    pub buffer: RecordBuffer,
    pub data: DashboardData,
    pub history: History,
    pub density: DensityParams,
    pub last_record_at: Option<Instant>,
    last_history_sample: Option<Instant>,

    // Maps
    pub panes: [MapPane; 2],
    pub locations: Vec<Location>,
    pub location_index: usize,
    pub zoom: u8,

    // UI
    pub language: Language,
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given source and settings.
    pub fn new(source: Box<dyn RecordSource>, settings: &Settings) -> Self {
        Self::with_theme(source, settings, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(source: Box<dyn RecordSource>, settings: &Settings, theme: Theme) -> Self {
        let locations = settings.locations();
        let zoom = settings.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let center = (locations[0].lat, locations[0].lon);
        let pane = |key: &str| MapPane {
            filter: SymptomFilter::from_key(key),
            map: MapView::new(center, zoom as f64),
        };

        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            source,
            buffer: RecordBuffer::with_capacity(settings.buffer_capacity),
            data: DashboardData::empty(&settings.density),
            history: History::new(),
            density: settings.density,
            last_record_at: None,
            last_history_sample: None,
            panes: [pane(&settings.left_filter), pane(&settings.right_filter)],
            locations,
            location_index: 0,
            zoom,
            language: settings.language,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn source_status(&self) -> SourceStatus {
        self.source.status()
    }

    pub fn labels(&self) -> &'static Labels {
        self.language.labels()
    }

    pub fn location(&self) -> &Location {
        &self.locations[self.location_index % self.locations.len()]
    }

    pub fn pane(&self, pane: Pane) -> &MapPane {
        &self.panes[pane.index()]
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Drain the source and recompute the dashboard if anything arrived.
    ///
    /// Returns the number of new records.
    pub fn reload_data(&mut self) -> usize {
        let now = Instant::now();
        let records = self.source.poll();
        let received = self.buffer.extend(records);

        if received > 0 {
            self.data = DashboardData::from_records(&self.buffer, &self.density);
            self.refresh_maps();
            self.last_record_at = Some(now);
            tracing::trace!(received, total = self.buffer.len(), "records ingested");
        }

        let sample_due = self
            .last_history_sample
            .is_none_or(|last| now.duration_since(last) >= HISTORY_INTERVAL);
        if sample_due {
            self.history.record(self.buffer.received(), now);
            self.last_history_sample = Some(now);
        }

        received
    }

    fn refresh_maps(&mut self) {
        for pane in &mut self.panes {
            pane.map.set_points(heat_points(&self.buffer, &pane.filter));
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Step a pane's symptom filter forward or backward through the cycle.
    pub fn cycle_filter(&mut self, pane: Pane, forward: bool) {
        let labels = self.language.labels();
        let slot = &mut self.panes[pane.index()];
        slot.filter = if forward {
            slot.filter.next()
        } else {
            slot.filter.prev()
        };
        slot.map.set_points(heat_points(&self.buffer, &slot.filter));
        let message = format!("{}: {}", pane.label(), labels.filter(&slot.filter));
        self.set_status_message(message);
    }

    /// Recenter both maps on the next configured location.
    pub fn cycle_location(&mut self) {
        self.location_index = (self.location_index + 1) % self.locations.len();
        self.apply_view(Instant::now());
        let message = format!("Centered on {}", self.location().name);
        self.set_status_message(message);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(1));
    }

    fn set_zoom(&mut self, zoom: u8) {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom {
            return;
        }
        self.zoom = zoom;
        let now = Instant::now();
        for pane in &mut self.panes {
            pane.map.set_zoom(zoom as f64, now);
        }
        self.set_status_message(format!("Zoom {}", zoom));
    }

    fn apply_view(&mut self, now: Instant) {
        let location = self.location();
        let center = (location.lat, location.lon);
        let zoom = self.zoom as f64;
        for pane in &mut self.panes {
            pane.map.set_view(center, zoom, now);
        }
    }

    /// Whether any map is mid-transition.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.panes.iter().any(|p| p.map.is_animating(now))
    }

    pub fn cycle_language(&mut self) {
        self.language = self.language.next();
        let message = format!("{}: {}", self.labels().language, self.language.code());
        self.set_status_message(message);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard summary to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        write_summary(&self.data, path)
    }
}

/// Write a dashboard summary as pretty-printed JSON.
pub fn write_summary(data: &DashboardData, path: &Path) -> Result<()> {
    use std::io::Write;

    let json = serde_json::to_string_pretty(&data.summary())?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    tracing::info!(path = %path.display(), records = data.record_count, "summary exported");

    Ok(())
}
