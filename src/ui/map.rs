//! Heatmap renderer.
//!
//! A [`MapView`] owns one map pane: its viewport, the animated transition
//! between viewports and the heat layer built from the current point list.
//! The view is initialized once when constructed and released when dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders,
    },
    Frame,
};

use crate::data::{HeatLayer, HeatPoint};

use super::theme::Theme;

/// Duration of the recentering animation.
pub const TRANSITION: Duration = Duration::from_millis(300);

/// Heat cells across the visible longitude span.
const CELLS_ACROSS: f64 = 48.0;

const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 18.0;

static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(1);

/// Geographic centre and zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(lat: f64, lon: f64, zoom: f64) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lon,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Degrees of longitude across the pane.
    pub fn lon_span(&self) -> f64 {
        360.0 / 2f64.powf(self.zoom)
    }

    /// Canvas bounds `(x, y)` for a pane of `width` x `height` cells.
    ///
    /// Terminal cells are about twice as tall as wide, so the latitude span
    /// is scaled to keep the map roughly undistorted.
    pub fn bounds(&self, width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
        let lon_half = self.lon_span() / 2.0;
        let aspect = if width == 0 {
            0.5
        } else {
            (height as f64 * 2.0) / width as f64
        };
        let lat_half = (lon_half * aspect).min(90.0);
        (
            [self.lon - lon_half, self.lon + lon_half],
            [self.lat - lat_half, self.lat + lat_half],
        )
    }

    fn lerp(&self, to: &Viewport, t: f64) -> Viewport {
        Viewport {
            lat: self.lat + (to.lat - self.lat) * t,
            lon: self.lon + (to.lon - self.lon) * t,
            zoom: self.zoom + (to.zoom - self.zoom) * t,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: Viewport,
    started: Instant,
}

/// Ease-out cubic.
fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3)
}

/// Size of one heat cell in degrees at `zoom`.
pub fn cell_degrees(zoom: f64) -> f64 {
    360.0 / 2f64.powf(zoom) / CELLS_ACROSS
}

/// One map pane with its heat layer.
#[derive(Debug)]
pub struct MapView {
    id: u64,
    target: Viewport,
    transition: Option<Transition>,
    points: Vec<HeatPoint>,
    layer: HeatLayer,
    generation: u64,
}

impl MapView {
    /// Initialize a map centred on `center` (`(lat, lon)`) at `zoom`.
    pub fn new(center: (f64, f64), zoom: f64) -> Self {
        let id = NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed);
        let target = Viewport::new(center.0, center.1, zoom);
        tracing::info!(map = id, lat = target.lat, lon = target.lon, zoom = target.zoom, "map initialized");

        Self {
            id,
            target,
            transition: None,
            points: Vec::new(),
            layer: HeatLayer::build(&[], cell_degrees(target.zoom)),
            generation: 0,
        }
    }

    /// Viewport the map is moving to (or resting at).
    pub fn target(&self) -> Viewport {
        self.target
    }

    /// Move to a new centre and zoom, animating from the viewport shown at
    /// `now`. Setting the current target again does nothing.
    pub fn set_view(&mut self, center: (f64, f64), zoom: f64, now: Instant) {
        let target = Viewport::new(center.0, center.1, zoom);
        if target == self.target {
            return;
        }

        let from = self.viewport_at(now);
        let zoom_changed = target.zoom != self.target.zoom;
        self.target = target;
        self.transition = Some(Transition { from, started: now });
        tracing::debug!(map = self.id, lat = target.lat, lon = target.lon, zoom = target.zoom, "map view changed");

        if zoom_changed {
            self.rebuild_layer();
        }
    }

    /// Change only the zoom level, keeping the current centre.
    pub fn set_zoom(&mut self, zoom: f64, now: Instant) {
        let center = (self.target.lat, self.target.lon);
        self.set_view(center, zoom, now);
    }

    /// Viewport displayed at `now`.
    pub fn viewport_at(&self, now: Instant) -> Viewport {
        match self.transition {
            Some(transition) => {
                let elapsed = now.saturating_duration_since(transition.started);
                if elapsed >= TRANSITION {
                    self.target
                } else {
                    let t = elapsed.as_secs_f64() / TRANSITION.as_secs_f64();
                    transition.from.lerp(&self.target, ease_out(t))
                }
            }
            None => self.target,
        }
    }

    /// Whether a transition is still running at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .is_some_and(|t| now.saturating_duration_since(t.started) < TRANSITION)
    }

    /// Replace the point list. When it differs from the current one the heat
    /// layer is discarded and rebuilt; returns whether that happened.
    pub fn set_points(&mut self, points: Vec<HeatPoint>) -> bool {
        if points == self.points {
            return false;
        }
        self.points = points;
        self.rebuild_layer();
        true
    }

    fn rebuild_layer(&mut self) {
        self.layer = HeatLayer::build(&self.points, cell_degrees(self.target.zoom));
        self.generation += 1;
        tracing::trace!(map = self.id, generation = self.generation, points = self.points.len(), "heat layer rebuilt");
    }

    pub fn points(&self) -> &[HeatPoint] {
        &self.points
    }

    pub fn layer(&self) -> &HeatLayer {
        &self.layer
    }

    /// Number of times the heat layer has been rebuilt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Draw the map outline and the heat layer.
    pub fn render(&self, frame: &mut Frame, area: Rect, title: Line<'_>, theme: &Theme, now: Instant) {
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border));

        let inner = block.inner(area);
        let viewport = self.viewport_at(now);
        let (x_bounds, y_bounds) = viewport.bounds(inner.width, inner.height);
        let half = self.layer.cell_degrees() / 2.0;

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    color: theme.map_outline,
                    resolution: MapResolution::High,
                });
                ctx.layer();

                for cell in self.layer.cells() {
                    let (r, g, b) = cell.color;
                    let coords = cell_fill(cell.lng, cell.lat, half);
                    ctx.draw(&Points {
                        coords: &coords,
                        color: Color::Rgb(r, g, b),
                    });
                }
            });

        frame.render_widget(canvas, area);
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        tracing::info!(map = self.id, "map released");
    }
}

/// A 3x3 grid of dots covering one cell, so cells stay visible when zoomed in.
fn cell_fill(x: f64, y: f64, half: f64) -> [(f64, f64); 9] {
    let d = half * 0.66;
    [
        (x - d, y - d),
        (x, y - d),
        (x + d, y - d),
        (x - d, y),
        (x, y),
        (x + d, y),
        (x - d, y + d),
        (x, y + d),
        (x + d, y + d),
    ]
}
