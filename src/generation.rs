//! Client for the text-to-music generation API.
//!
//! A [`GenerationRequest`] is turned into the API's payload shape
//! ([`GenerationPayload`]), posted with bearer authorization, and the reply
//! is normalized into a list of [`GeneratedMusic`] whatever result shape the
//! service used.

mod client;
mod request;
mod response;

pub use client::*;
pub use request::*;
pub use response::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("duration must be a positive number of seconds")]
    InvalidDuration,
    /// Non-success status; `message` comes from the response body when it has one.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unreadable response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("No music generated. Please try again.")]
    NoMusicGenerated,
}

impl GenerationError {
    /// Rejected locally, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyPrompt | Self::InvalidDuration)
    }
}

/// Anything that can turn a request into generated tracks.
pub trait MusicGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedMusic>, GenerationError>;
}

/// Downloads the audio behind a generated track's URL.
pub trait AudioFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GenerationError>;
}

#[cfg(test)]
mod tests;
