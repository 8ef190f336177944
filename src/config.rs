//! Drover configuration.
//!
//! Loaded from `~/.drover/config.toml`. Every key is optional; a missing
//! file means all defaults.
//!
//! ```toml
//! driver-name = "Sam Carter"
//! progress-interval-ms = 2000
//! progress-step = 5
//! epod-unlock-percent = 95
//! submission-delay-ms = 1500
//! log-filter = "info"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config at {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Drover configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Name shown on outgoing chat messages.
    pub driver_name: String,

    /// How often trip progress advances while in transit.
    pub progress_interval_ms: u64,

    /// Percent added on each progress tick.
    pub progress_step: u8,

    /// Progress at which the ePOD tab opens.
    pub epod_unlock_percent: u8,

    /// Simulated latency for ePOD, chat, and incident submissions.
    pub submission_delay_ms: u64,

    /// `tracing` filter directive. `DROVER_LOG` overrides it.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver_name: "Driver".to_string(),
            progress_interval_ms: 2000,
            progress_step: 5,
            epod_unlock_percent: 95,
            submission_delay_ms: 1500,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from `~/.drover/config.toml`, falling back to defaults
    /// when the file or the home directory is missing.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.progress_interval_ms == 0 {
            return Err("progress-interval-ms must be greater than 0".to_string());
        }
        if !(1..=100).contains(&self.progress_step) {
            return Err(format!(
                "progress-step must be between 1 and 100, got {}",
                self.progress_step
            ));
        }
        if self.epod_unlock_percent > 100 {
            return Err(format!(
                "epod-unlock-percent must be at most 100, got {}",
                self.epod_unlock_percent
            ));
        }
        if self.driver_name.trim().is_empty() {
            return Err("driver-name is empty".to_string());
        }
        Ok(())
    }

    /// The drover home directory: `~/.drover/`.
    pub fn dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".drover"))
    }

    /// The config file path: `~/.drover/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.progress_interval_ms, 2000);
        assert_eq!(config.progress_step, 5);
        assert_eq!(config.epod_unlock_percent, 95);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let (_dir, path) = write_config("driver-name = \"Sam Carter\"\nprogress-step = 10\n");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.driver_name, "Sam Carter");
        assert_eq!(config.progress_step, 10);
        assert_eq!(config.submission_delay_ms, 1500);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let (_dir, path) = write_config("driver-name = ");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let (_dir, path) = write_config("driver = \"Sam\"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        for contents in [
            "progress-step = 0",
            "progress-step = 101",
            "progress-interval-ms = 0",
            "epod-unlock-percent = 120",
            "driver-name = \"  \"",
        ] {
            let (_dir, path) = write_config(contents);
            let err = Config::load_from(&path).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { .. }),
                "{contents} should be invalid"
            );
        }
    }
}
