use anyhow::Context;
use disastercore::prelude::{FilterState, DEFAULT_MAX_COUNT, DEFAULT_MIN_MAGNITUDE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Monitor settings loaded from YAML or assembled from CLI flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_min_magnitude")]
    pub min_magnitude: f64,
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    #[serde(default)]
    pub news_api_key: Option<String>,
    /// Override of the seismic feed base URL, mainly for test servers.
    #[serde(default)]
    pub quake_endpoint: Option<String>,
    #[serde(default)]
    pub news_endpoint: Option<String>,
}

fn default_min_magnitude() -> f64 {
    DEFAULT_MIN_MAGNITUDE
}

fn default_max_count() -> u32 {
    DEFAULT_MAX_COUNT
}

impl MonitorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading monitor config {}", path_ref.display()))?;
        let config: MonitorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing monitor config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(min_magnitude: f64, max_count: u32, news_api_key: Option<String>) -> Self {
        Self {
            min_magnitude,
            max_count,
            news_api_key,
            quake_endpoint: None,
            news_endpoint: None,
        }
    }

    /// Filter state with the same fallback rules as the dashboard inputs.
    pub fn to_filter_state(&self) -> FilterState {
        let min_magnitude = if self.min_magnitude >= 0.0 {
            self.min_magnitude
        } else {
            DEFAULT_MIN_MAGNITUDE
        };
        let max_count = if self.max_count >= 1 {
            self.max_count
        } else {
            DEFAULT_MAX_COUNT
        };
        FilterState {
            min_magnitude,
            max_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_filter_state() {
        let config = MonitorConfig::from_args(4.5, 25, None);
        let filters = config.to_filter_state();
        assert_eq!(filters.min_magnitude, 4.5);
        assert_eq!(filters.max_count, 25);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = MonitorConfig::from_args(-1.0, 0, None);
        let filters = config.to_filter_state();
        assert_eq!(filters.min_magnitude, DEFAULT_MIN_MAGNITUDE);
        assert_eq!(filters.max_count, DEFAULT_MAX_COUNT);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"min_magnitude: 4\nmax_count: 30\nnews_api_key: abc123\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = MonitorConfig::load(&path).unwrap();
        assert_eq!(config.min_magnitude, 4.0);
        assert_eq!(config.max_count, 30);
        assert_eq!(config.news_api_key.as_deref(), Some("abc123"));
        assert!(config.quake_endpoint.is_none());
    }

    #[test]
    fn config_load_fills_missing_fields_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"news_api_key: abc123\n").unwrap();
        let path = temp.into_temp_path();
        let config = MonitorConfig::load(&path).unwrap();
        assert_eq!(config.min_magnitude, DEFAULT_MIN_MAGNITUDE);
        assert_eq!(config.max_count, DEFAULT_MAX_COUNT);
    }
}
