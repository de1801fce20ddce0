use std::{env, path::PathBuf};

use super::schema::Settings;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MUSICFLOW_CONFIG_PATH";
const ENV_PREFIX: &str = "MUSICFLOW";

/// Configuration loading helpers.
///
/// `Settings::load` layers environment variables (prefix `MUSICFLOW__`) over an
/// optional config file over struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the rest of the application cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let volume = self.player.default_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!("player.default_volume must be within 0..=1, got {volume}"));
        }
        if !(self.player.volume_step > 0.0 && self.player.volume_step <= 1.0) {
            return Err("player.volume_step must be within (0, 1]".to_string());
        }
        if self.generation.endpoint.trim().is_empty() {
            return Err("generation.endpoint must not be empty".to_string());
        }
        if self.generation.model.trim().is_empty() {
            return Err("generation.model must not be empty".to_string());
        }
        if self.generation.sample_rate == 0 || self.generation.bitrate == 0 {
            return Err("generation.sample_rate and generation.bitrate must be > 0".to_string());
        }
        if self.separation.max_upload_bytes == 0 {
            return Err("separation.max_upload_bytes must be > 0".to_string());
        }
        if self.separation.accepted_extensions.is_empty() {
            return Err("separation.accepted_extensions must not be empty".to_string());
        }
        if self.separation.poll_interval_ms == 0 {
            return Err("separation.poll_interval_ms must be >= 1".to_string());
        }
        let bucket = self.storage.bucket.trim();
        if bucket.is_empty() || bucket.contains('/') {
            return Err("storage.bucket must be a non-empty name without '/'".to_string());
        }
        Ok(())
    }

    /// Directory holding the library snapshot, session and uploads.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from(".musicflow"))
    }
}

/// Resolve the config path from `MUSICFLOW_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/musicflow/config.toml`
/// or `~/.config/musicflow/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("musicflow").join("config.toml"))
}

/// `$XDG_DATA_HOME/musicflow` or `~/.local/share/musicflow`.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("musicflow"))
}
