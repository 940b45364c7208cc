//! Heat points and the binned heat layer drawn on the map.

use std::collections::HashMap;

use healthwatch_types::{HealthRecord, NO_SYMPTOMS_TAG};

/// Intensity assigned to every point.
pub const POINT_INTENSITY: f64 = 10.0;

/// Symptom tags offered as map filters, in cycle order after `All`.
pub const SYMPTOM_TAGS: [&str; 6] = ["heavysmoker", "cold", "influenza", "covid", "sars", "rsv"];

/// Which records a map pane shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymptomFilter {
    /// Every record that does not carry the `"none"` tag.
    All,
    /// Records carrying this exact tag.
    Tag(String),
}

impl SymptomFilter {
    pub fn tag(tag: &str) -> Self {
        SymptomFilter::Tag(tag.to_string())
    }

    /// Whether a record passes this filter.
    pub fn matches(&self, record: &HealthRecord) -> bool {
        match self {
            SymptomFilter::All => !record.has_symptom(NO_SYMPTOMS_TAG),
            SymptomFilter::Tag(tag) => record.has_symptom(tag),
        }
    }

    /// Key used in configuration and labels ("All" or the tag).
    pub fn key(&self) -> &str {
        match self {
            SymptomFilter::All => "All",
            SymptomFilter::Tag(tag) => tag,
        }
    }

    /// Parse a configuration key. Unknown tags are still accepted.
    pub fn from_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("all") {
            SymptomFilter::All
        } else {
            SymptomFilter::Tag(key.to_string())
        }
    }

    /// Next filter in the cycle `All → heavysmoker → … → rsv → All`.
    pub fn next(&self) -> Self {
        self.step(1)
    }

    /// Previous filter in the cycle.
    pub fn prev(&self) -> Self {
        self.step(SYMPTOM_TAGS.len())
    }

    fn step(&self, by: usize) -> Self {
        // Position 0 is All; unknown tags restart the cycle from All.
        let position = match self {
            SymptomFilter::All => 0,
            SymptomFilter::Tag(tag) => SYMPTOM_TAGS
                .iter()
                .position(|t| *t == tag.as_str())
                .map_or(0, |i| i + 1),
        };
        match (position + by) % (SYMPTOM_TAGS.len() + 1) {
            0 => SymptomFilter::All,
            i => SymptomFilter::tag(SYMPTOM_TAGS[i - 1]),
        }
    }
}

/// A weighted location on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

/// Points for the records that pass `filter`, in arrival order.
///
/// Records without both coordinates are skipped.
pub fn heat_points<'a, I>(records: I, filter: &SymptomFilter) -> Vec<HeatPoint>
where
    I: IntoIterator<Item = &'a HealthRecord>,
{
    records
        .into_iter()
        .filter(|r| filter.matches(r))
        .filter_map(HealthRecord::coordinates)
        .map(|(lat, lng)| HeatPoint {
            lat,
            lng,
            intensity: POINT_INTENSITY,
        })
        .collect()
}

/// One binned cell of the heat layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    /// Cell centre.
    pub lat: f64,
    pub lng: f64,
    /// Summed intensity normalized by the hottest cell, in `(0, 1]`.
    pub weight: f64,
    pub color: (u8, u8, u8),
}

/// Density overlay built from a point list.
///
/// A layer is immutable: when the point list changes the owner discards it
/// and builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayer {
    cells: Vec<HeatCell>,
    cell_degrees: f64,
    point_count: usize,
}

impl HeatLayer {
    /// Bin points into square cells of `cell_degrees` and colour each cell by
    /// its share of the hottest cell's intensity.
    pub fn build(points: &[HeatPoint], cell_degrees: f64) -> Self {
        let cell_degrees = if cell_degrees.is_finite() && cell_degrees > 0.0 {
            cell_degrees
        } else {
            1.0
        };

        let mut bins: HashMap<(i64, i64), f64> = HashMap::new();
        for p in points {
            let key = (
                (p.lat / cell_degrees).floor() as i64,
                (p.lng / cell_degrees).floor() as i64,
            );
            *bins.entry(key).or_default() += p.intensity;
        }

        let max = bins.values().copied().fold(0.0_f64, f64::max);
        let mut cells: Vec<HeatCell> = if max > 0.0 {
            bins.into_iter()
                .map(|((row, col), total)| {
                    let weight = total / max;
                    HeatCell {
                        lat: (row as f64 + 0.5) * cell_degrees,
                        lng: (col as f64 + 0.5) * cell_degrees,
                        weight,
                        color: gradient_color(weight),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        // Draw cooler cells first so hot spots end up on top
        cells.sort_by(|a, b| a.weight.total_cmp(&b.weight));

        Self {
            cells,
            cell_degrees,
            point_count: points.len(),
        }
    }

    pub fn cells(&self) -> &[HeatCell] {
        &self.cells
    }

    pub fn cell_degrees(&self) -> f64 {
        self.cell_degrees
    }

    /// Number of points the layer was built from.
    pub fn point_count(&self) -> usize {
        self.point_count
    }
}

/// Gradient stops: blue up to 0.4, lime at 0.65, red at 1.0.
const GRADIENT: [(f64, (u8, u8, u8)); 3] = [
    (0.4, (0, 0, 255)),
    (0.65, (0, 255, 0)),
    (1.0, (255, 0, 0)),
];

/// Colour for a normalized weight, linearly interpolated between stops.
pub fn gradient_color(weight: f64) -> (u8, u8, u8) {
    let w = weight.clamp(0.0, 1.0);
    let (first_stop, first_color) = GRADIENT[0];
    if w <= first_stop {
        return first_color;
    }

    for pair in GRADIENT.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if w <= hi {
            let t = (w - lo) / (hi - lo);
            return lerp_rgb(lo_color, hi_color, t);
        }
    }

    GRADIENT[GRADIENT.len() - 1].1
}

fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
