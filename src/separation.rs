//! Stem separation: upload checks, the processor contract, and job polling.
//!
//! A job is submitted to a [`SeparationProcessor`] and polled until every
//! requested stem has either produced an output or failed. The simulated
//! processor stands in for a hosted service.

mod processor;
mod simulated;
mod upload;

pub use processor::*;
pub use simulated::*;
pub use upload::*;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeparationError {
    #[error("unsupported file type `{0}`; use MP3, WAV, FLAC, M4A or OGG")]
    UnsupportedFormat(String),
    #[error("file exceeds the {limit_mb} MB limit")]
    TooLarge { size: u64, limit_mb: u64 },
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown separation job {0}")]
    UnknownJob(String),
    #[error("separation cancelled")]
    Cancelled,
    #[error("separation backend error: {0}")]
    Backend(String),
}

impl SeparationError {
    /// Rejected before anything was uploaded.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_) | Self::TooLarge { .. })
    }
}

/// An isolated component of a mix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stem {
    Vocals,
    Instrumental,
    Drums,
    Bass,
    Piano,
    Guitar,
    Other,
}

impl Stem {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vocals => "vocals",
            Self::Instrumental => "instrumental",
            Self::Drums => "drums",
            Self::Bass => "bass",
            Self::Piano => "piano",
            Self::Guitar => "guitar",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stems a job extracts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparationModel {
    Vocals,
    Instrumental,
    Drums,
    Bass,
    Piano,
    Guitar,
    #[default]
    Full,
}

impl SeparationModel {
    pub const ALL: [SeparationModel; 7] = [
        Self::Vocals,
        Self::Instrumental,
        Self::Full,
        Self::Drums,
        Self::Bass,
        Self::Piano,
        Self::Guitar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vocals => "vocals",
            Self::Instrumental => "instrumental",
            Self::Drums => "drums",
            Self::Bass => "bass",
            Self::Piano => "piano",
            Self::Guitar => "guitar",
            Self::Full => "full",
        }
    }

    /// Stems produced, primary stem first.
    pub fn stems(self) -> Vec<Stem> {
        match self {
            Self::Full => vec![Stem::Vocals, Stem::Instrumental, Stem::Drums, Stem::Bass],
            Self::Vocals => vec![Stem::Vocals, Stem::Instrumental],
            Self::Instrumental => vec![Stem::Instrumental, Stem::Vocals],
            Self::Drums => vec![Stem::Drums, Stem::Other],
            Self::Bass => vec![Stem::Bass, Stem::Other],
            Self::Piano => vec![Stem::Piano, Stem::Other],
            Self::Guitar => vec![Stem::Guitar, Stem::Other],
        }
    }
}

impl fmt::Display for SeparationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeparationModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown separation model `{s}`"))
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp3,
    Wav,
    Flac,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            "flac" => Ok(Self::Flac),
            other => Err(format!("unknown output format `{other}`")),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "128")]
    Kbps128,
    #[default]
    #[serde(rename = "320")]
    Kbps320,
    #[serde(rename = "lossless")]
    Lossless,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kbps128 => "128",
            Self::Kbps320 => "320",
            Self::Lossless => "lossless",
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "128" => Ok(Self::Kbps128),
            "320" => Ok(Self::Kbps320),
            "lossless" => Ok(Self::Lossless),
            other => Err(format!("unknown quality `{other}`")),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SeparationOptions {
    pub model: SeparationModel,
    pub format: OutputFormat,
    pub quality: Quality,
}
