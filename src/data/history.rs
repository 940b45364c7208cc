//! Ingestion history for the header sparkline and arrival rate.

use std::collections::VecDeque;
use std::time::Instant;

/// Maximum number of samples to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks the cumulative received count over time.
///
/// One sample is recorded per refresh, which lets the header show how many
/// records arrived recently and at what rate.
#[derive(Debug, Clone)]
pub struct History {
    /// Cumulative received count at each sample.
    pub received: VecDeque<u64>,
    /// Timestamps of samples for rate calculations.
    pub timestamps: VecDeque<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            received: VecDeque::new(),
            timestamps: VecDeque::new(),
        }
    }

    /// Record the cumulative received count at `at`.
    pub fn record(&mut self, received: u64, at: Instant) {
        self.received.push_back(received);
        if self.received.len() > MAX_HISTORY_SIZE {
            self.received.pop_front();
        }

        self.timestamps.push_back(at);
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    /// Arrivals per sample, normalized to 0-7 for 8 bar levels.
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self) -> Vec<u8> {
        if self.received.len() < 2 {
            return Vec::new();
        }

        let deltas: Vec<u64> = self
            .received
            .iter()
            .zip(self.received.iter().skip(1))
            .map(|(a, b)| b.saturating_sub(*a))
            .collect();

        let max = deltas.iter().copied().max().unwrap_or(0).max(1) as f64;

        deltas
            .iter()
            .map(|&v| ((v as f64 / max * 7.0).round() as u8).min(7))
            .collect()
    }

    /// Arrival rate (records per second) over the retained window.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn rate(&self) -> Option<f64> {
        if self.received.len() < 2 || self.timestamps.len() < 2 {
            return None;
        }

        let first = *self.received.front()?;
        let last = *self.received.back()?;
        let elapsed = self
            .timestamps
            .back()?
            .duration_since(*self.timestamps.front()?)
            .as_secs_f64();

        if elapsed > 0.0 {
            Some(last.saturating_sub(first) as f64 / elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_not_enough_history() {
        let mut history = History::new();
        assert!(history.sparkline().is_empty());
        assert!(history.rate().is_none());

        history.record(5, Instant::now());
        assert!(history.sparkline().is_empty());
        assert!(history.rate().is_none());
    }

    #[test]
    fn test_rate_and_sparkline() {
        let start = Instant::now();
        let mut history = History::new();
        history.record(0, start);
        history.record(10, start + Duration::from_secs(1));
        history.record(10, start + Duration::from_secs(2));
        history.record(15, start + Duration::from_secs(4));

        let rate = history.rate().unwrap();
        assert!((rate - 3.75).abs() < 1e-9);
        assert_eq!(history.sparkline(), vec![7, 0, 4]);
    }

    #[test]
    fn test_window_is_bounded() {
        let start = Instant::now();
        let mut history = History::new();
        for i in 0..(MAX_HISTORY_SIZE as u64 + 10) {
            history.record(i, start + Duration::from_millis(i * 100));
        }
        assert_eq!(history.received.len(), MAX_HISTORY_SIZE);
        assert_eq!(history.timestamps.len(), MAX_HISTORY_SIZE);
        assert_eq!(*history.received.front().unwrap(), 10);
    }
}
