//! Logging setup.
//!
//! The trip screen owns the terminal, so it logs to a file under
//! `~/.drover/`. Headless commands log to stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const FILTER_ENV: &str = "DROVER_LOG";

/// Where log lines go.
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Installs the global subscriber.
///
/// `DROVER_LOG` wins over `default_filter` when set.
pub fn init(default_filter: &str, target: LogTarget) -> Result<(), String> {
    let filter = EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| format!("invalid log filter: {e}"))?;

    let result = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| format!("failed to install logger: {e}"))
}
