//! The audio device as a [`MediaElement`].
//!
//! Decoding and output run on a worker thread that owns the `rodio` stream.
//! Commands go in over a channel; [`MediaEvent`]s come back on another and
//! are drained by the event loop with [`RodioElement::events`].

mod sink;
mod thread;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::player::{Epoch, MediaElement, MediaError, MediaEvent};
use crate::storage::local_path;

use thread::{AudioCmd, spawn_audio_thread};

pub struct RodioElement {
    tx: Sender<AudioCmd>,
    events: Receiver<MediaEvent>,
    join: Option<JoinHandle<()>>,
}

impl RodioElement {
    /// Open the default output device.
    pub fn open() -> Result<Self, MediaError> {
        let (tx, rx) = mpsc::channel();
        let (event_tx, events) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let join = spawn_audio_thread(rx, event_tx, ready_tx);

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                events,
                join: Some(join),
            }),
            Ok(Err(reason)) => {
                let _ = join.join();
                Err(MediaError::Unavailable(reason))
            }
            Err(_) => {
                let _ = join.join();
                Err(MediaError::Unavailable("audio thread exited".to_string()))
            }
        }
    }

    /// Events produced since the last call.
    pub fn events(&self) -> impl Iterator<Item = MediaEvent> + '_ {
        self.events.try_iter()
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), MediaError> {
        self.tx
            .send(cmd)
            .map_err(|_| MediaError::Rejected("audio thread stopped".to_string()))
    }
}

/// Map a media locator to a readable local file.
///
/// Only local files can be played; remote locators are a load error.
pub fn resolve_source(url: &str) -> Result<PathBuf, MediaError> {
    let path = local_path(url).ok_or_else(|| MediaError::Load {
        url: url.to_string(),
        reason: "remote sources cannot be streamed".to_string(),
    })?;
    if !path.is_file() {
        return Err(MediaError::Load {
            url: url.to_string(),
            reason: "file not found".to_string(),
        });
    }
    Ok(path)
}

impl MediaElement for RodioElement {
    fn load(&mut self, url: &str, epoch: Epoch) -> Result<(), MediaError> {
        let path = resolve_source(url)?;
        debug!(%url, epoch, "loading");
        self.send(AudioCmd::Load { path, epoch })
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn set_volume(&mut self, volume: f64) {
        let _ = self.send(AudioCmd::SetVolume(volume.clamp(0.0, 1.0) as f32));
    }

    fn seek(&mut self, seconds: f64) -> Result<(), MediaError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(MediaError::Seek(format!("invalid position {seconds}")));
        }
        self.send(AudioCmd::Seek(Duration::from_secs_f64(seconds)))
            .map_err(|e| MediaError::Seek(e.to_string()))
    }

    fn unload(&mut self) {
        let _ = self.send(AudioCmd::Unload);
    }
}

impl Drop for RodioElement {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

#[cfg(test)]
mod tests;
