use thiserror::Error;
use tracing::{debug, warn};

use super::engine::{Epoch, PlayerEngine};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no audio output available: {0}")]
    Unavailable(String),
    #[error("cannot load `{url}`: {reason}")]
    Load { url: String, reason: String },
    #[error("playback rejected: {0}")]
    Rejected(String),
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Something that can actually play a source: an audio device, a browser
/// element, or a test double.
pub trait MediaElement {
    /// Replace the source. Events produced for it must carry `epoch`.
    fn load(&mut self, url: &str, epoch: Epoch) -> Result<(), MediaError>;
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f64);
    fn seek(&mut self, seconds: f64) -> Result<(), MediaError>;
    fn unload(&mut self);
}

/// Callback from a media element, tagged with the epoch of its load.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    TimeUpdate { epoch: Epoch, position: f64 },
    LoadedMetadata { epoch: Epoch, duration: f64 },
    Ended { epoch: Epoch },
    Failed { epoch: Epoch, message: String },
}

impl MediaEvent {
    pub fn epoch(&self) -> Epoch {
        match self {
            Self::TimeUpdate { epoch, .. }
            | Self::LoadedMetadata { epoch, .. }
            | Self::Ended { epoch }
            | Self::Failed { epoch, .. } => *epoch,
        }
    }
}

/// Mirrors [`PlayerEngine`] state onto exactly one [`MediaElement`].
///
/// Call [`sync`](Self::sync) after every batch of engine mutations and feed
/// element callbacks through [`handle_event`](Self::handle_event).
#[derive(Debug)]
pub struct MediaBinding<E> {
    element: E,
    loaded: Option<Epoch>,
    source_ok: bool,
    playing: bool,
    volume: Option<f64>,
}

impl<E: MediaElement> MediaBinding<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            loaded: None,
            source_ok: false,
            playing: false,
            volume: None,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    pub fn into_inner(self) -> E {
        self.element
    }

    /// Bring the element in line with the engine.
    ///
    /// A source change reloads the element and resets `duration`. A failed
    /// load or a rejected play clears the engine's `is_playing`.
    pub fn sync(&mut self, engine: &mut PlayerEngine) {
        if self.volume != Some(engine.volume()) {
            self.element.set_volume(engine.volume());
            self.volume = Some(engine.volume());
        }

        let epoch = engine.epoch();
        if self.loaded != Some(epoch) {
            self.loaded = Some(epoch);
            self.playing = false;
            engine.set_duration(0.0);
            match engine.current_track().map(|t| t.file_url.clone()) {
                Some(url) => match self.element.load(&url, epoch) {
                    Ok(()) => {
                        debug!(epoch, %url, "source loaded");
                        self.source_ok = true;
                    }
                    Err(err) => {
                        warn!(epoch, error = %err, "media load failed");
                        self.source_ok = false;
                        engine.set_is_playing(false);
                    }
                },
                None => {
                    self.element.unload();
                    self.source_ok = false;
                }
            }
        }

        // Play after a failed source: reload once, or give up the intent.
        if engine.is_playing() && !self.source_ok {
            self.source_ok = self.reload(engine);
            if !self.source_ok {
                engine.set_is_playing(false);
            }
        }

        if engine.is_playing() && !self.playing && self.source_ok {
            match self.element.play() {
                Ok(()) => self.playing = true,
                Err(err) => {
                    warn!(error = %err, "media element rejected play");
                    engine.set_is_playing(false);
                }
            }
        } else if !engine.is_playing() && self.playing {
            self.element.pause();
            self.playing = false;
        }
    }

    fn reload(&mut self, engine: &mut PlayerEngine) -> bool {
        let Some(url) = engine.current_track().map(|t| t.file_url.clone()) else {
            return false;
        };
        let epoch = engine.epoch();
        match self.element.load(&url, epoch) {
            Ok(()) => {
                debug!(epoch, %url, "source reloaded");
                engine.set_duration(0.0);
                true
            }
            Err(err) => {
                warn!(epoch, error = %err, "media reload failed");
                false
            }
        }
    }

    /// Apply an element callback. Returns `false` for stale events.
    pub fn handle_event(&mut self, engine: &mut PlayerEngine, event: MediaEvent) -> bool {
        if event.epoch() != engine.epoch() {
            debug!(event_epoch = event.epoch(), current = engine.epoch(), "dropping stale media event");
            return false;
        }
        match event {
            MediaEvent::TimeUpdate { position, .. } => engine.set_progress(position),
            MediaEvent::LoadedMetadata { duration, .. } => engine.set_duration(duration),
            MediaEvent::Ended { epoch } => {
                self.playing = false;
                engine.next_track();
                if engine.epoch() == epoch {
                    engine.set_is_playing(false);
                }
            }
            MediaEvent::Failed { message, .. } => {
                warn!(%message, "media playback failed");
                self.playing = false;
                self.source_ok = false;
                engine.set_is_playing(false);
            }
        }
        true
    }

    /// Seek within the current source, clamped to `[0, duration]` when the
    /// duration is known. The engine's progress follows a successful seek.
    pub fn seek(&mut self, engine: &mut PlayerEngine, seconds: f64) -> Result<(), MediaError> {
        if !self.source_ok {
            return Ok(());
        }
        let mut target = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        let duration = engine.state().duration;
        if duration > 0.0 {
            target = target.min(duration);
        }
        self.element.seek(target)?;
        engine.set_progress(target);
        Ok(())
    }

    pub fn seek_by(&mut self, engine: &mut PlayerEngine, delta: f64) -> Result<(), MediaError> {
        let target = engine.state().progress + delta;
        self.seek(engine, target)
    }
}
