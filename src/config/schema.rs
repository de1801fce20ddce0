use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::player::{DEFAULT_VOLUME, PlaybackMode};
use crate::separation::{MAX_UPLOAD_BYTES, OutputFormat, Quality, SeparationModel};
use crate::storage::DEFAULT_BUCKET;

/// Variable consulted when `generation.api_key` is not set.
pub const API_KEY_ENV: &str = "MINIMAX_API_KEY";

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/musicflow/config.toml` or `~/.config/musicflow/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSICFLOW__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub generation: GenerationSettings,
    pub separation: SeparationSettings,
    pub storage: StorageSettings,
    pub library: LibrarySettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Volume on startup, `0.0..=1.0`.
    pub default_volume: f64,
    pub playback_mode: PlaybackMode,
    /// Seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            playback_mode: PlaybackMode::Sequential,
            seek_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub endpoint: String,
    pub model: String,
    /// Bearer token. Falls back to `MINIMAX_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub sample_rate: u32,
    pub bitrate: u32,
    pub format: String,
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.minimax.io/v1/music_generation".to_string(),
            model: "music-2.5".to_string(),
            api_key: None,
            sample_rate: 44_100,
            bitrate: 256_000,
            format: "mp3".to_string(),
            timeout_secs: 120,
        }
    }
}

impl GenerationSettings {
    /// Configured key, else the environment fallback. Blank keys count as missing.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), env::var(API_KEY_ENV).ok())
    }
}

pub(crate) fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .map(str::to_string)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| from_env.filter(|k| !k.trim().is_empty()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationSettings {
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: u64,
    /// Upload extensions, case-insensitive, without dot.
    pub accepted_extensions: Vec<String>,
    pub default_model: SeparationModel,
    pub output_format: OutputFormat,
    pub quality: Quality,
    /// How long the simulated processor takes per job.
    pub simulated_delay_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for SeparationSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            accepted_extensions: ["mp3", "wav", "flac", "m4a", "ogg"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_model: SeparationModel::Full,
            output_format: OutputFormat::Mp3,
            quality: Quality::Kbps320,
            simulated_delay_ms: 3000,
            poll_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the library, session and uploaded objects live.
    ///
    /// Defaults to `$XDG_DATA_HOME/musicflow` or `~/.local/share/musicflow`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to import as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Artist recorded for files without an artist tag.
    pub unknown_artist: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "wav", "ogg", "m4a"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            unknown_artist: "Unknown Artist".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// OAuth authorize endpoint; `provider` and `redirect_to` are appended.
    pub authorize_url: String,
    /// Where the provider sends the user back.
    pub redirect_url: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            authorize_url: "https://auth.musicflow.app/authorize".to_string(),
            redirect_url: "http://localhost:5173/dashboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `warn` or `musicflow=debug`.
    pub level: String,
    /// Log file. The player always logs to a file since it owns the terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ MusicFlow ~ ".to_string(),
        }
    }
}
