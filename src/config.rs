//! Settings loaded from an optional TOML file and the environment.
//!
//! # Configuration
//!
//! ```toml
//! endpoint = "wss://example.org/stream"
//! buffer_capacity = 50000
//! ping_interval_secs = 300
//! language = "ja"
//!
//! [[locations]]
//! name = "Silicon Valley"
//! lat = 37.3382
//! lon = -121.8863
//!
//! [reconnect]
//! max_attempts = 10
//! ```
//!
//! Every key can be overridden from the environment with the `HEALTHWATCH`
//! prefix, using `__` for nested keys (`HEALTHWATCH_ENDPOINT`,
//! `HEALTHWATCH_RECONNECT__MAX_ATTEMPTS`).

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::DensityParams;
use crate::source::{ReconnectPolicy, WebSocketOptions};
use crate::ui::labels::Language;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "HEALTHWATCH";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// WebSocket endpoint to connect to when no other source is given.
    pub endpoint: Option<String>,
    /// Maximum records kept in memory. Unset keeps everything.
    pub buffer_capacity: Option<usize>,
    pub ping_interval_secs: u64,
    /// UI refresh interval.
    pub refresh_ms: u64,
    /// Initial map zoom level.
    pub zoom: u8,
    pub language: Language,
    /// Map centres cycled with `o`. The first one is the initial view.
    pub locations: Vec<Location>,
    /// Symptom filters of the two map panes, as keys (`"All"`, `"covid"`, ...).
    pub left_filter: String,
    pub right_filter: String,
    pub density: DensityParams,
    pub reconnect: ReconnectSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            buffer_capacity: None,
            ping_interval_secs: 300,
            refresh_ms: 100,
            zoom: 10,
            language: Language::En,
            locations: vec![Location::default()],
            left_filter: "covid".to_string(),
            right_filter: "cold".to_string(),
            density: DensityParams::default(),
            reconnect: ReconnectSettings::default(),
        }
    }
}

/// A named map centre.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            name: "Silicon Valley".to_string(),
            lat: 37.3382,
            lon: -121.8863,
        }
    }
}

/// Reconnection settings, in configuration units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconnectSettings {
    pub enabled: bool,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub jitter: f64,
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        let policy = ReconnectPolicy::default();
        Self {
            enabled: policy.enabled,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            multiplier: policy.multiplier,
            jitter: policy.jitter,
            max_attempts: policy.max_attempts,
        }
    }
}

impl ReconnectSettings {
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            enabled: self.enabled,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.initial_delay_ms)),
            multiplier: self.multiplier,
            jitter: self.jitter,
            max_attempts: self.max_attempts,
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the process environment.
    ///
    /// An explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(env)
            .build()
            .context("Failed to load configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;

        if !settings.density.is_valid() {
            bail!(
                "Invalid density parameters: std_dev and step must be finite and positive (got std_dev={}, step={})",
                settings.density.std_dev,
                settings.density.step
            );
        }
        if settings.ping_interval_secs == 0 {
            bail!("ping_interval_secs must be at least 1");
        }

        tracing::debug!(?settings, "configuration loaded");
        Ok(settings)
    }

    /// Override the keepalive interval. Only whole seconds are accepted.
    pub fn set_ping_interval(&mut self, interval: Duration) -> Result<()> {
        if interval.subsec_nanos() != 0 || interval.as_secs() == 0 {
            bail!(
                "Ping interval must be a whole number of seconds, got {:?}",
                interval
            );
        }
        self.ping_interval_secs = interval.as_secs();
        Ok(())
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(10))
    }

    pub fn websocket_options(&self) -> WebSocketOptions {
        WebSocketOptions {
            ping_interval: self.ping_interval(),
            reconnect: self.reconnect.policy(),
        }
    }

    /// Configured locations, falling back to the default centre.
    pub fn locations(&self) -> Vec<Location> {
        if self.locations.is_empty() {
            vec![Location::default()]
        } else {
            self.locations.clone()
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ping_interval(), Duration::from_secs(300));
        assert_eq!(settings.locations()[0].name, "Silicon Valley");
        assert_eq!(settings.density.mean, 2.170383376216376);
        assert!(settings.reconnect.policy().enabled);
    }

    #[test]
    fn test_file_values() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
endpoint = "ws://localhost:9000"
buffer_capacity = 500
language = "ar"

[[locations]]
name = "Tokyo"
lat = 35.6762
lon = 139.6503

[density]
std_dev = 1.5

[reconnect]
enabled = false
"#
        )
        .unwrap();

        let settings = Settings::load_with(Some(file.path()), env(&[])).unwrap();
        assert_eq!(settings.endpoint.as_deref(), Some("ws://localhost:9000"));
        assert_eq!(settings.buffer_capacity, Some(500));
        assert_eq!(settings.language, Language::Ar);
        assert_eq!(settings.locations.len(), 1);
        assert_eq!(settings.locations[0].name, "Tokyo");
        assert_eq!(settings.density.std_dev, 1.5);
        assert_eq!(settings.density.step, 0.1);
        assert!(settings.reconnect.policy().next_delay(0).is_none());
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "endpoint = \"ws://from-file\"").unwrap();

        let settings = Settings::load_with(
            Some(file.path()),
            env(&[
                ("HEALTHWATCH_ENDPOINT", "ws://from-env"),
                ("HEALTHWATCH_RECONNECT__MAX_ATTEMPTS", "4"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.endpoint.as_deref(), Some("ws://from-env"));
        assert_eq!(settings.reconnect.max_attempts, Some(4));
    }

    #[test]
    fn test_invalid_density_rejected() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[density]\nstep = 0.0").unwrap();
        let err = Settings::load_with(Some(file.path()), env(&[])).unwrap_err();
        assert!(err.to_string().contains("density"));

        let result = Settings::load_with(None, env(&[("HEALTHWATCH_DENSITY__STD_DEV", "-1")]));
        assert!(result.is_err());

        let result = Settings::load_with(None, env(&[("HEALTHWATCH_DENSITY__STD_DEV", "inf")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_set_ping_interval() {
        let mut settings = Settings::default();
        settings.set_ping_interval(Duration::from_secs(30)).unwrap();
        assert_eq!(settings.ping_interval(), Duration::from_secs(30));

        assert!(settings.set_ping_interval(Duration::from_millis(250)).is_err());
        assert!(settings.set_ping_interval(Duration::from_millis(1500)).is_err());
        assert!(settings.set_ping_interval(Duration::ZERO).is_err());
        // Rejected values leave the setting unchanged
        assert_eq!(settings.ping_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Settings::load_with(Some(Path::new("/nonexistent/healthwatch.toml")), env(&[]));
        assert!(result.is_err());
    }
}
