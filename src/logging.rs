//! `tracing` subscriber setup for the binary.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Overrides `logging.level` with a full filter directive string.
pub const LOG_ENV: &str = "MUSICFLOW_LOG";

/// Build the filter: `MUSICFLOW_LOG` when set and valid, else the configured level.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Install the global subscriber.
///
/// Logs go to `settings.file`, else to `fallback_file`, else to stderr. The
/// terminal UI passes a fallback so log lines never land on its screen.
pub fn init(settings: &LoggingSettings, fallback_file: Option<&Path>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(settings));

    match settings.file.as_deref().or(fallback_file) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    }
}
