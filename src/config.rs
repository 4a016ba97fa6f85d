use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Tuning knobs for a [`Monitor`](crate::Monitor).
///
/// Immutable after construction; the monitor takes it by value. Defaults
/// match a human-facing service dashboard: probe every 10 seconds, flag a
/// streak of 5 consecutive failures, give each probe 5 seconds to answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Consecutive failures before the monitor reports retry exhaustion.
    pub max_retries: u32,
    /// Delay between the completion of one probe and the start of the next.
    pub poll_interval_ms: u64,
    /// Upper bound on a single probe; overrun counts as a timeout failure.
    pub probe_timeout_ms: u64,
    /// Re-check cadence used by `wait_for_connection` callers.
    pub wait_poll_interval_ms: u64,
}

impl MonitorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: MonitorConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_retries",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        for (field, value) in [
            ("poll_interval_ms", self.poll_interval_ms),
            ("probe_timeout_ms", self.probe_timeout_ms),
            ("wait_poll_interval_ms", self.wait_poll_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be positive".into(),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn wait_poll_interval(&self) -> Duration {
        Duration::from_millis(self.wait_poll_interval_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            poll_interval_ms: 10_000,
            probe_timeout_ms: 5_000,
            wait_poll_interval_ms: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.wait_poll_interval() < config.poll_interval());
    }

    #[test]
    fn rejects_zero_max_retries() {
        let config = MonitorConfig {
            max_retries: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn rejects_zero_intervals() {
        for field in [
            "poll_interval_ms",
            "probe_timeout_ms",
            "wait_poll_interval_ms",
        ] {
            let mut config = MonitorConfig::default();
            match field {
                "poll_interval_ms" => config.poll_interval_ms = 0,
                "probe_timeout_ms" => config.probe_timeout_ms = 0,
                _ => config.wait_poll_interval_ms = 0,
            }
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains(field), "missing field in: {err}");
        }
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: MonitorConfig = toml::from_str("max_retries = 3").unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.poll_interval_ms, 10_000);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<MonitorConfig, _> = toml::from_str("retry_backoff = 2");
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_ms = 2000\nwait_poll_interval_ms = 250").unwrap();

        let config = MonitorConfig::load(file.path()).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(2000));
        assert_eq!(config.wait_poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_retries = 0").unwrap();

        assert!(MonitorConfig::load(file.path()).is_err());
    }
}
