//! The player engine and its contract with a media element.
//!
//! [`PlayerEngine`] owns the single authoritative [`PlayerState`]: the queue,
//! the current track, transport intent, volume and the playback mode. It
//! never touches audio itself. [`MediaBinding`] is the one place where that
//! state is translated into calls on a [`MediaElement`], and where events
//! coming back from the element are folded into the engine.

mod binding;
mod engine;
mod mode;

pub use binding::*;
pub use engine::*;
pub use mode::*;

/// Format a position in seconds as `m:ss`.
///
/// Negative and non-finite values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
