use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Policy deciding which queue entry `next_track` selects.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Advance by one, wrapping to the start after the last entry.
    #[default]
    #[serde(alias = "normal", alias = "in-order")]
    Sequential,
    /// Advance by one modulo the queue length.
    #[serde(alias = "loop-all", alias = "loop_all", alias = "repeat")]
    Loop,
    /// Pick a uniformly random entry, possibly the current one.
    #[serde(alias = "random")]
    Shuffle,
    /// Stay on the current entry.
    #[serde(alias = "loop-one", alias = "loop_one", alias = "repeat-one")]
    Single,
}

impl PlaybackMode {
    pub const ALL: [PlaybackMode; 4] = [
        PlaybackMode::Sequential,
        PlaybackMode::Loop,
        PlaybackMode::Shuffle,
        PlaybackMode::Single,
    ];

    /// The mode the transport button switches to next.
    pub fn cycle(self) -> Self {
        match self {
            Self::Sequential => Self::Loop,
            Self::Loop => Self::Shuffle,
            Self::Shuffle => Self::Single,
            Self::Single => Self::Sequential,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Loop => "loop",
            Self::Shuffle => "shuffle",
            Self::Single => "single",
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown playback mode `{s}`"))
    }
}
