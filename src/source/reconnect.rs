//! Reconnection policy for long-lived connections.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff with jitter.
///
/// The delay before retry `attempt` (0-based) is
/// `min(initial_delay * multiplier^attempt, max_delay)`, scaled by a random
/// factor in `[1 - jitter, 1 + jitter)`. A successful connection resets the
/// attempt counter; `max_attempts` bounds consecutive failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Fraction of the delay to randomize, in `[0, 1]`.
    pub jitter: f64,
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.2,
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Never reconnect: connection loss ends the source.
    pub fn never() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Delay before retry `attempt`, with `unit` in `[0, 1)` selecting the
    /// point inside the jitter band.
    pub fn delay(&self, attempt: u32, unit: f64) -> Duration {
        let multiplier = self.multiplier.max(1.0);
        let exponent = attempt.min(64) as i32;
        let base = self.initial_delay.as_secs_f64() * multiplier.powi(exponent);
        let capped = base.min(self.max_delay.as_secs_f64());

        let jitter = self.jitter.clamp(0.0, 1.0);
        let factor = 1.0 - jitter + 2.0 * jitter * unit.clamp(0.0, 1.0);

        Duration::from_secs_f64((capped * factor).max(0.0))
    }

    /// Delay before retry `attempt`, or `None` when retrying is disabled or
    /// the attempt budget is spent.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        if self.max_attempts.is_some_and(|max| attempt >= max) {
            return None;
        }
        let unit: f64 = rand::thread_rng().gen();
        Some(self.delay(attempt, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter() -> ReconnectPolicy {
        ReconnectPolicy {
            jitter: 0.0,
            ..ReconnectPolicy::default()
        }
    }

    #[test]
    fn test_exponential_growth_is_capped() {
        let policy = no_jitter();
        assert_eq!(policy.delay(0, 0.5), Duration::from_millis(500));
        assert_eq!(policy.delay(1, 0.5), Duration::from_secs(1));
        assert_eq!(policy.delay(3, 0.5), Duration::from_secs(4));
        assert_eq!(policy.delay(10, 0.5), Duration::from_secs(30));
        assert_eq!(policy.delay(u32::MAX, 0.5), Duration::from_secs(30));
    }

    #[test]
    fn test_jitter_band() {
        let policy = ReconnectPolicy::default();
        let low = policy.delay(2, 0.0).as_secs_f64();
        let high = policy.delay(2, 1.0).as_secs_f64();
        assert!((low - 1.6).abs() < 1e-9);
        assert!((high - 2.4).abs() < 1e-9);

        for attempt in 0..8 {
            let d = policy.next_delay(attempt).unwrap().as_secs_f64();
            let base = policy.delay(attempt, 0.5).as_secs_f64();
            assert!(d >= base * 0.8 - 1e-9 && d <= base * 1.2 + 1e-9);
        }
    }

    #[test]
    fn test_never() {
        let policy = ReconnectPolicy::never();
        assert!(policy.next_delay(0).is_none());
    }

    #[test]
    fn test_max_attempts() {
        let policy = ReconnectPolicy {
            max_attempts: Some(2),
            ..ReconnectPolicy::default()
        };
        assert!(policy.next_delay(0).is_some());
        assert!(policy.next_delay(1).is_some());
        assert!(policy.next_delay(2).is_none());
    }
}
