use serde::Serialize;

use crate::config::GenerationSettings;

use super::GenerationError;

/// Length used when the request does not name one.
pub const DEFAULT_DURATION: u32 = 60;
/// Lengths offered by the generation form, in seconds.
pub const DURATION_CHOICES: [u32; 5] = [15, 30, 60, 90, 120];

pub const GENRES: &[&str] = &[
    "pop",
    "electronic",
    "classical",
    "jazz",
    "rock",
    "hip-hop",
    "r&b",
    "folk",
    "ambient",
];

pub const MOODS: &[&str] = &[
    "happy",
    "sad",
    "relaxed",
    "energetic",
    "romantic",
    "dark",
    "uplifting",
    "melancholic",
];

const TITLE_CHARS: usize = 30;
const FALLBACK_TITLE: &str = "AI Generated Music";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub lyrics: Option<String>,
    pub genre: Option<String>,
    pub mood: Option<String>,
    /// Seconds.
    pub duration: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        if self.duration == Some(0) {
            return Err(GenerationError::InvalidDuration);
        }
        Ok(())
    }

    /// `genre, mood, prompt`, skipping the parts that are blank.
    pub fn combined_prompt(&self) -> String {
        [self.genre.as_deref(), self.mood.as_deref(), Some(self.prompt.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The request's lyrics, or a verse/chorus template around the prompt.
    pub fn lyrics_or_default(&self) -> String {
        match self.lyrics.as_deref().map(str::trim) {
            Some(lyrics) if !lyrics.is_empty() => lyrics.to_string(),
            _ => format!("[Verse]\n{}\n[Chorus]\nMusic flows\n[Outro]", self.prompt.trim()),
        }
    }

    /// First 30 characters of the prompt.
    pub fn title(&self) -> String {
        let title: String = self.prompt.chars().take(TITLE_CHARS).collect();
        if title.trim().is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            title
        }
    }

    pub fn duration_or_default(&self) -> u32 {
        self.duration.unwrap_or(DEFAULT_DURATION)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioSetting {
    pub sample_rate: u32,
    pub bitrate: u32,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Body posted to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPayload {
    pub model: String,
    pub prompt: String,
    pub lyrics: String,
    pub audio_setting: AudioSetting,
}

impl GenerationPayload {
    pub fn new(request: &GenerationRequest, settings: &GenerationSettings) -> Self {
        Self {
            model: settings.model.clone(),
            prompt: request.combined_prompt(),
            lyrics: request.lyrics_or_default(),
            audio_setting: AudioSetting {
                sample_rate: settings.sample_rate,
                bitrate: settings.bitrate,
                format: settings.format.clone(),
                duration: request.duration,
            },
        }
    }
}
