use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::playback::PlaybackSettings;
use crate::propagator::{PropagatorSettings, SimulationRequest};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub propagator: PropagatorSettings,
    pub defaults: RequestDefaults,
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    pub ui_dir: PathBuf,
    /// Longest a single simulation may run before it is cancelled.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            ui_dir: PathBuf::from("ui"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Values used by the web layer when a request omits a field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub altitude_km: f64,
    pub velocity_mps: f64,
    pub duration_s: f64,
    pub inclination_deg: f64,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            altitude_km: 400.0,
            velocity_mps: 0.0,
            duration_s: 7000.0,
            inclination_deg: 0.0,
        }
    }
}

impl RequestDefaults {
    pub fn request(&self) -> SimulationRequest {
        SimulationRequest::new(self.altitude_km, self.velocity_mps, self.duration_s)
            .with_inclination(self.inclination_deg)
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_str("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:5000");
        assert_eq!(config.web.timeout, Duration::from_secs(30));
        assert_eq!(config.propagator.tolerance, 1e-6);
        assert_eq!(config.defaults.request(), SimulationRequest::new(400.0, 0.0, 7000.0));
        assert_eq!(config.playback.frame_skip, 15);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r#"
web:
  bind: "127.0.0.1:8080"
  timeout: 2m 30s
propagator:
  step_s: 0.5
defaults:
  duration_s: 5500
"#;
        let config = Config::from_str(yaml).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:8080");
        assert_eq!(config.web.ui_dir, PathBuf::from("ui"));
        assert_eq!(config.web.timeout, Duration::from_secs(150));
        assert_eq!(config.propagator.step_s, 0.5);
        assert_eq!(config.propagator.max_refinements, 2);
        assert_eq!(config.defaults.duration_s, 5500.0);
        assert_eq!(config.defaults.altitude_km, 400.0);
    }

    #[test]
    fn example_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.yaml");
        let config = Config::from_file(path).unwrap();
        let defaults = Config::default();
        assert_eq!(config.web.bind, defaults.web.bind);
        assert_eq!(config.web.timeout, defaults.web.timeout);
        assert_eq!(config.propagator.max_samples, defaults.propagator.max_samples);
        assert_eq!(config.defaults.request(), defaults.defaults.request());
        assert_eq!(config.playback.margin, defaults.playback.margin);
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_str("web:\n  timeout: soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
