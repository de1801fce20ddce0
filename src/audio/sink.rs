//! Opening and decoding a source into a paused `rodio` sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

/// A paused sink holding the decoded file, plus its length when known.
pub(super) struct OpenedSource {
    pub sink: Sink,
    pub duration: Option<Duration>,
}

pub(super) fn open_paused(stream: &OutputStream, path: &Path, volume: f32) -> Result<OpenedSource, String> {
    let file = File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let source =
        Decoder::new(BufReader::new(file)).map_err(|e| format!("cannot decode {}: {e}", path.display()))?;
    let duration = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(OpenedSource { sink, duration })
}
