//! Local music folders and the on-disk catalog.
//!
//! Folders are scanned for audio files, each file is uploaded to object
//! storage and becomes a [`Track`](crate::model::Track). The catalog file
//! keeps tracks, playlists and projects between runs.

mod scan;
mod snapshot;

pub use scan::*;
pub use snapshot::*;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::LibrarySettings;
use crate::model::Track;
use crate::storage::ObjectStore;
use crate::store::LibraryStore;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    /// New track ids, in scan order.
    pub imported: Vec<String>,
    /// Files that could not be uploaded, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Import every audio file under `dir` for `owner`.
///
/// Imported tracks go to the front of the library in scan order. Upload
/// failures are collected, not fatal.
pub fn import_dir(
    dir: &Path,
    owner: &str,
    settings: &LibrarySettings,
    objects: &dyn ObjectStore,
    library: &mut LibraryStore,
) -> Result<ImportSummary, LibraryError> {
    if !dir.is_dir() {
        return Err(LibraryError::NotADirectory(dir.to_path_buf()));
    }

    let mut summary = ImportSummary::default();
    let mut tracks = Vec::new();
    for file in scan(dir, settings) {
        match objects.upload(owner, &file.path) {
            Ok(url) => {
                let artist = file.artist.clone().unwrap_or_else(|| settings.unknown_artist.clone());
                let mut track = Track::new(owner, file.title.clone(), artist, url, file.duration_secs());
                if let Some(album) = &file.album {
                    track = track.with_album(album.clone());
                }
                summary.imported.push(track.id.clone());
                tracks.push(track);
            }
            Err(err) => {
                warn!(path = %file.path.display(), error = %err, "skipping file");
                summary.failed.push((file.path, err.to_string()));
            }
        }
    }

    for track in tracks.into_iter().rev() {
        library.add_track(track);
    }
    info!(
        dir = %dir.display(),
        imported = summary.imported.len(),
        failed = summary.failed.len(),
        "import finished"
    );
    Ok(summary)
}
