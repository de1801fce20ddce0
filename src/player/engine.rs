use std::sync::Arc;

use tracing::debug;

use crate::model::Track;

use super::mode::PlaybackMode;

/// Volume applied on startup and when unmuting.
pub const DEFAULT_VOLUME: f64 = 0.8;

/// Load generation counter.
///
/// Bumped every time the loaded source changes, so callbacks produced by an
/// earlier load can be recognised and dropped.
pub type Epoch = u64;

/// Source of random queue positions for shuffle mode.
pub trait IndexPicker: Send {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform picker backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl IndexPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::random_range(0..len)
    }
}

/// Coarse transport state derived from [`PlayerState`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transport {
    /// No current track.
    Idle,
    Paused,
    Playing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub current_track: Option<Arc<Track>>,
    pub queue: Vec<Arc<Track>>,
    /// Always `< queue.len()` when set.
    pub queue_index: Option<usize>,
    pub is_playing: bool,
    /// Playback position in seconds.
    pub progress: f64,
    /// Length of the loaded source in seconds; 0 until metadata arrives.
    pub duration: f64,
    /// In `[0, 1]`.
    pub volume: f64,
    pub playback_mode: PlaybackMode,
    pub epoch: Epoch,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_track: None,
            queue: Vec::new(),
            queue_index: None,
            is_playing: false,
            progress: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            playback_mode: PlaybackMode::default(),
            epoch: 0,
        }
    }
}

/// Owns the player state and exposes its transitions.
///
/// Every operation is total: out-of-range input is clamped or ignored.
pub struct PlayerEngine {
    state: PlayerState,
    picker: Box<dyn IndexPicker>,
}

impl Default for PlayerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlayerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerEngine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PlayerEngine {
    pub fn new() -> Self {
        Self::with_picker(RandomPicker)
    }

    /// Start from configured volume and mode.
    pub fn with_defaults(volume: f64, mode: PlaybackMode) -> Self {
        let mut engine = Self::new();
        engine.set_volume(volume);
        engine.set_playback_mode(mode);
        engine
    }

    /// Use a custom shuffle source (deterministic pickers in tests).
    pub fn with_picker(picker: impl IndexPicker + 'static) -> Self {
        Self {
            state: PlayerState::default(),
            picker: Box::new(picker),
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.state.current_track.as_ref()
    }

    pub fn queue(&self) -> &[Arc<Track>] {
        &self.state.queue
    }

    pub fn queue_index(&self) -> Option<usize> {
        self.state.queue_index
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn volume(&self) -> f64 {
        self.state.volume
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.state.playback_mode
    }

    pub fn epoch(&self) -> Epoch {
        self.state.epoch
    }

    pub fn transport(&self) -> Transport {
        match (&self.state.current_track, self.state.is_playing) {
            (None, _) => Transport::Idle,
            (Some(_), false) => Transport::Paused,
            (Some(_), true) => Transport::Playing,
        }
    }

    /// Replace the queue and select `start_index`.
    ///
    /// An empty queue or an out-of-range index leaves no current track.
    /// Transport intent is unchanged.
    pub fn set_queue(&mut self, tracks: Vec<Arc<Track>>, start_index: usize) {
        let current = tracks.get(start_index).cloned();
        self.state.queue_index = current.as_ref().map(|_| start_index);
        self.state.current_track = current;
        self.state.queue = tracks;
        self.state.progress = 0.0;
        self.bump_epoch();
        debug!(
            len = self.state.queue.len(),
            index = ?self.state.queue_index,
            "queue replaced"
        );
    }

    /// Convenience for callers holding plain tracks.
    pub fn set_queue_from(&mut self, tracks: &[Track], start_index: usize) {
        let tracks = tracks.iter().cloned().map(Arc::new).collect();
        self.set_queue(tracks, start_index);
    }

    /// Set the current track without touching the queue.
    pub fn set_current_track(&mut self, track: Option<Arc<Track>>) {
        self.state.current_track = track;
        self.state.progress = 0.0;
        self.bump_epoch();
    }

    /// Record transport intent. The media binding acts on it.
    pub fn set_is_playing(&mut self, playing: bool) {
        self.state.is_playing = playing;
    }

    pub fn toggle_playing(&mut self) {
        self.state.is_playing = !self.state.is_playing;
    }

    pub fn set_progress(&mut self, seconds: f64) {
        self.state.progress = non_negative(seconds);
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.state.duration = non_negative(seconds);
    }

    /// Clamp into `[0, 1]`. NaN is ignored.
    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        self.state.volume = volume.clamp(0.0, 1.0);
    }

    /// Silence when audible, otherwise restore [`DEFAULT_VOLUME`].
    pub fn toggle_mute(&mut self) {
        if self.state.volume > 0.0 {
            self.state.volume = 0.0;
        } else {
            self.state.volume = DEFAULT_VOLUME;
        }
    }

    pub fn set_playback_mode(&mut self, mode: PlaybackMode) {
        self.state.playback_mode = mode;
    }

    pub fn cycle_playback_mode(&mut self) -> PlaybackMode {
        self.state.playback_mode = self.state.playback_mode.cycle();
        self.state.playback_mode
    }

    /// Advance according to the playback mode. No-op on an empty queue.
    pub fn next_track(&mut self) {
        let len = self.state.queue.len();
        if len == 0 {
            return;
        }
        let next = match (self.state.playback_mode, self.state.queue_index) {
            (PlaybackMode::Shuffle, _) => self.picker.pick(len) % len,
            (_, None) => 0,
            (PlaybackMode::Single, Some(i)) => i,
            (PlaybackMode::Sequential | PlaybackMode::Loop, Some(i)) => (i + 1) % len,
        };
        self.move_to(next);
    }

    /// Step back one entry, wrapping to the last. Ignores the playback mode.
    pub fn prev_track(&mut self) {
        let len = self.state.queue.len();
        if len == 0 {
            return;
        }
        let prev = match self.state.queue_index {
            None | Some(0) => len - 1,
            Some(i) => i - 1,
        };
        self.move_to(prev);
    }

    fn move_to(&mut self, index: usize) {
        self.state.queue_index = Some(index);
        self.state.current_track = self.state.queue.get(index).cloned();
        self.state.progress = 0.0;
        self.bump_epoch();
        debug!(index, mode = %self.state.playback_mode, "track changed");
    }

    fn bump_epoch(&mut self) {
        self.state.epoch = self.state.epoch.wrapping_add(1);
    }
}

fn non_negative(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
