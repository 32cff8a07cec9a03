use anyhow::Context;
use hotline_execution::Schedule;
use hotline_types::{FIRST_STOP, SECOND_STOP_DELAY};
use serde::Deserialize;
use std::{path::Path, str::FromStr, time::Duration};
use tracing::Level;

/// Simulator configuration, loaded from YAML.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    /// Table seed. A random seed is drawn when absent.
    pub seed: Option<u64>,
    pub viewport_width: u32,
    pub first_stop_ms: u64,
    pub second_stop_delay_ms: u64,
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            seed: None,
            viewport_width: 1_860,
            first_stop_ms: FIRST_STOP.as_millis() as u64,
            second_stop_delay_ms: SECOND_STOP_DELAY.as_millis() as u64,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    pub fn parse(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("could not parse config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::parse(&raw)
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            first_stop: Duration::from_millis(self.first_stop_ms),
            second_stop_delay: Duration::from_millis(self.second_stop_delay_ms),
        }
    }

    pub fn level(&self) -> anyhow::Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("invalid log level: {}", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_game_timing() {
        let config = Config::default();
        assert_eq!(config.schedule(), Schedule::default());
        assert_eq!(config.level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_partial_yaml() {
        let config = Config::parse("port: 9000\nseed: 42\nsecond_stop_delay_ms: 750\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.viewport_width, 1_860);
        assert_eq!(config.schedule().second_stop_delay, Duration::from_millis(750));
        assert_eq!(config.schedule().first_stop, FIRST_STOP);
    }

    #[test]
    fn test_invalid_level() {
        let config = Config::parse("log_level: loud\n").unwrap();
        assert!(config.level().is_err());
    }

    #[test]
    fn test_unparseable_yaml() {
        assert!(Config::parse("port: [1, 2]").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 7000\nseed: 9\nfirst_stop_ms: 1200\njson_logs: true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.seed, Some(9));
        assert!(config.json_logs);
        assert_eq!(config.schedule().first_stop, Duration::from_millis(1_200));
        assert_eq!(config.schedule().second_stop_delay, SECOND_STOP_DELAY);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("could not read config file"));
    }
}
