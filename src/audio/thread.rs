use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::player::{Epoch, MediaEvent};

use super::sink::open_paused;

const TICK: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub(super) enum AudioCmd {
    Load { path: PathBuf, epoch: Epoch },
    Unload,
    Play,
    Pause,
    SetVolume(f32),
    Seek(Duration),
    Quit,
}

struct Current {
    sink: Sink,
    epoch: Epoch,
    playing: bool,
    ended: bool,
}

/// Spawn the audio worker. `ready` receives `Err` if no output device opens.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    ready: SyncSender<Result<(), String>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(err) => {
                let _ = ready.send(Err(err.to_string()));
                return;
            }
        };
        // rodio prints to stderr when the stream drops, which garbles the TUI.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut volume = 1.0_f32;
        let mut current: Option<Current> = None;

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(cmd) => handle(cmd, &stream, &mut current, &mut volume, &events),
                Err(RecvTimeoutError::Timeout) => {}
            }
            report_progress(&mut current, &events);
        }

        if let Some(cur) = current.take() {
            cur.sink.stop();
        }
        debug!("audio thread stopped");
    })
}

fn handle(
    cmd: AudioCmd,
    stream: &OutputStream,
    current: &mut Option<Current>,
    volume: &mut f32,
    events: &Sender<MediaEvent>,
) {
    match cmd {
        AudioCmd::Load { path, epoch } => {
            if let Some(old) = current.take() {
                old.sink.stop();
            }
            match open_paused(stream, &path, *volume) {
                Ok(opened) => {
                    if let Some(d) = opened.duration {
                        let _ = events.send(MediaEvent::LoadedMetadata {
                            epoch,
                            duration: d.as_secs_f64(),
                        });
                    }
                    *current = Some(Current {
                        sink: opened.sink,
                        epoch,
                        playing: false,
                        ended: false,
                    });
                }
                Err(message) => {
                    warn!(path = %path.display(), %message, "load failed");
                    let _ = events.send(MediaEvent::Failed { epoch, message });
                }
            }
        }
        AudioCmd::Unload => {
            if let Some(old) = current.take() {
                old.sink.stop();
            }
        }
        AudioCmd::Play => {
            if let Some(cur) = current.as_mut() {
                cur.sink.play();
                cur.playing = true;
            }
        }
        AudioCmd::Pause => {
            if let Some(cur) = current.as_mut() {
                cur.sink.pause();
                cur.playing = false;
            }
        }
        AudioCmd::SetVolume(v) => {
            *volume = v;
            if let Some(cur) = current.as_ref() {
                cur.sink.set_volume(v);
            }
        }
        AudioCmd::Seek(pos) => {
            if let Some(cur) = current.as_mut() {
                match cur.sink.try_seek(pos) {
                    Ok(()) => cur.ended = false,
                    Err(err) => warn!(error = %err, "seek failed"),
                }
            }
        }
        AudioCmd::Quit => {}
    }
}

fn report_progress(current: &mut Option<Current>, events: &Sender<MediaEvent>) {
    let Some(cur) = current.as_mut() else {
        return;
    };
    if !cur.playing || cur.ended {
        return;
    }
    let _ = events.send(MediaEvent::TimeUpdate {
        epoch: cur.epoch,
        position: cur.sink.get_pos().as_secs_f64(),
    });
    if cur.sink.empty() {
        cur.ended = true;
        let _ = events.send(MediaEvent::Ended { epoch: cur.epoch });
    }
}
