use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::config::GenerationSettings;

use super::{
    AudioFetcher, GeneratedMusic, GenerationError, GenerationPayload, GenerationRequest, MusicGenerator,
    interpret_response,
};

/// Blocking HTTP client for the generation endpoint.
///
/// One request is in flight per call; the caller blocks until it settles.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: Client,
    settings: GenerationSettings,
}

impl GenerationClient {
    pub fn new(settings: GenerationSettings) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent(concat!("musicflow/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}

impl MusicGenerator for GenerationClient {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedMusic>, GenerationError> {
        request.validate()?;
        let api_key = self.settings.api_key().ok_or(GenerationError::MissingApiKey)?;
        let payload = GenerationPayload::new(request, &self.settings);

        info!(
            endpoint = %self.settings.endpoint,
            model = %payload.model,
            duration = ?payload.audio_setting.duration,
            "requesting music generation"
        );
        let response = self
            .http
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        let result = interpret_response(status, &body, request);
        match &result {
            Ok(tracks) => info!(count = tracks.len(), "generation finished"),
            Err(err) => warn!(status, error = %err, "generation failed"),
        }
        result
    }
}

impl AudioFetcher for GenerationClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: format!("download of {url} failed with {status}"),
            });
        }
        let bytes = response.bytes()?;
        debug!(%url, size = bytes.len(), "generated audio downloaded");
        Ok(bytes.to_vec())
    }
}
