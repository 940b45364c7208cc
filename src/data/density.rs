//! Reference Gaussian and per-sample markers for the distance-metric chart.

use serde::Deserialize;

/// Parameters of the reference distribution.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DensityParams {
    pub mean: f64,
    pub std_dev: f64,
    /// Spacing between curve samples.
    pub step: f64,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            mean: 2.170383376216376,
            std_dev: 2.0,
            step: 0.1,
        }
    }
}

impl DensityParams {
    /// Domain of the curve: three standard deviations either side of the mean.
    pub fn domain(&self) -> (f64, f64) {
        (self.mean - 3.0 * self.std_dev, self.mean + 3.0 * self.std_dev)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        gaussian_pdf(x, self.mean, self.std_dev)
    }

    /// Whether the parameters describe a drawable curve.
    pub fn is_valid(&self) -> bool {
        self.mean.is_finite()
            && self.std_dev.is_finite()
            && self.std_dev > 0.0
            && self.step.is_finite()
            && self.step > 0.0
    }
}

/// Gaussian probability density at `x`.
pub fn gaussian_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (1.0 / (std_dev * (2.0 * std::f64::consts::PI).sqrt())) * (-0.5 * z * z).exp()
}

/// Upper bound on curve samples; a finer step is widened to fit.
pub const MAX_CURVE_POINTS: usize = 10_000;

/// Sample the density over `[mean - 3σ, mean + 3σ]` at a fixed step.
///
/// Positions are `start + i * step`, so the path does not drift over long
/// domains. Returns an empty path for invalid parameters. At most
/// [`MAX_CURVE_POINTS`] samples are produced.
pub fn bell_curve(params: &DensityParams) -> Vec<(f64, f64)> {
    if !params.is_valid() {
        return Vec::new();
    }

    let (start, end) = params.domain();
    let span = end - start;
    if !span.is_finite() {
        return Vec::new();
    }

    let intervals = (span / params.step + 1e-9).floor();
    let (count, step) = if intervals >= (MAX_CURVE_POINTS - 1) as f64 {
        (MAX_CURVE_POINTS, span / (MAX_CURVE_POINTS - 1) as f64)
    } else {
        (intervals as usize + 1, params.step)
    };

    (0..count)
        .map(|i| {
            let x = start + i as f64 * step;
            (x, params.pdf(x))
        })
        .collect()
}

/// A sample positioned on the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    /// Visual emphasis in `[0.1, 1.0]`.
    pub opacity: f64,
}

/// Emphasis for the sample at `index` out of `total`, oldest first.
///
/// The latest sample is fully opaque and the one before it is at 0.4. Older
/// samples ramp linearly from 0.1 with their position in the sequence.
pub fn marker_opacity(index: usize, total: usize) -> f64 {
    if index + 1 == total {
        1.0
    } else if index + 2 == total {
        0.4
    } else {
        0.1 + 0.3 * (index as f64 / total as f64)
    }
}

/// One marker per sample, in arrival order.
pub fn sample_markers(samples: &[f64], params: &DensityParams) -> Vec<Marker> {
    let total = samples.len();
    samples
        .iter()
        .enumerate()
        .map(|(index, &x)| Marker {
            x,
            y: params.pdf(x),
            opacity: marker_opacity(index, total),
        })
        .collect()
}

/// Five evenly spaced axis ticks from `min` to `max`.
pub fn axis_ticks(min: f64, max: f64) -> [f64; 5] {
    let interval = (max - min) / 4.0;
    [
        min,
        min + interval,
        min + 2.0 * interval,
        min + 3.0 * interval,
        max,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> DensityParams {
        DensityParams {
            mean: 0.0,
            std_dev: 1.0,
            step: 0.1,
        }
    }

    #[test]
    fn test_standard_normal_peak() {
        let curve = bell_curve(&standard());
        let (peak_x, peak_y) = curve
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();

        let expected = 1.0 / (2.0 * std::f64::consts::PI).sqrt();
        assert!(peak_x.abs() < 1e-9);
        assert!((peak_y - expected).abs() < 1e-12);
        assert!((peak_y - 0.3989).abs() < 1e-4);
    }

    #[test]
    fn test_curve_covers_domain() {
        let curve = bell_curve(&standard());
        assert_eq!(curve.len(), 61);
        assert!((curve[0].0 + 3.0).abs() < 1e-9);
        assert!((curve[60].0 - 3.0).abs() < 1e-9);
        // Symmetric around the mean
        assert!((curve[10].1 - curve[50].1).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_params() {
        let mut params = standard();
        params.step = 0.0;
        assert!(bell_curve(&params).is_empty());

        let mut params = standard();
        params.std_dev = 0.0;
        assert!(bell_curve(&params).is_empty());
    }

    #[test]
    fn test_non_finite_params() {
        let mut params = standard();
        params.std_dev = f64::INFINITY;
        assert!(bell_curve(&params).is_empty());

        let mut params = standard();
        params.mean = f64::NAN;
        assert!(bell_curve(&params).is_empty());

        let mut params = standard();
        params.step = f64::INFINITY;
        assert!(bell_curve(&params).is_empty());

        // Finite but wide enough that the domain itself overflows
        let mut params = standard();
        params.std_dev = f64::MAX;
        assert!(bell_curve(&params).is_empty());
    }

    #[test]
    fn test_tiny_step_is_capped() {
        let mut params = standard();
        params.step = 1e-12;
        let curve = bell_curve(&params);

        assert_eq!(curve.len(), MAX_CURVE_POINTS);
        assert!((curve[0].0 + 3.0).abs() < 1e-9);
        assert!((curve[MAX_CURVE_POINTS - 1].0 - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_opacity_tiers() {
        assert_eq!(marker_opacity(0, 1), 1.0);
        assert_eq!(marker_opacity(1, 2), 1.0);
        assert_eq!(marker_opacity(0, 2), 0.4);
        assert_eq!(marker_opacity(9, 10), 1.0);
        assert_eq!(marker_opacity(8, 10), 0.4);
        assert!((marker_opacity(0, 10) - 0.1).abs() < 1e-12);
        assert!((marker_opacity(5, 10) - 0.25).abs() < 1e-12);
        assert!((marker_opacity(7, 10) - 0.31).abs() < 1e-12);
    }

    #[test]
    fn test_sample_markers() {
        let params = standard();
        let markers = sample_markers(&[-1.0, 0.0, 1.0], &params);

        assert_eq!(markers.len(), 3);
        assert_eq!(markers[2].opacity, 1.0);
        assert_eq!(markers[1].opacity, 0.4);
        assert!((markers[0].opacity - 0.1).abs() < 1e-12);
        assert!((markers[1].y - params.pdf(0.0)).abs() < 1e-12);
        assert!((markers[0].y - markers[2].y).abs() < 1e-12);
        assert!(sample_markers(&[], &params).is_empty());
    }

    #[test]
    fn test_axis_ticks() {
        assert_eq!(axis_ticks(-3.0, 5.0), [-3.0, -1.0, 1.0, 3.0, 5.0]);
    }
}
