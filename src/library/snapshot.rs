use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Playlist, Project, Track};
use crate::store::{LibraryStore, ProjectStore};

use super::LibraryError;

const CATALOG_FILE_NAME: &str = "library.json";
const CATALOG_VERSION: u32 = 1;

/// Everything the user owns, as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub version: u32,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl CatalogSnapshot {
    pub fn capture(library: &LibraryStore, projects: &ProjectStore) -> Self {
        Self {
            version: CATALOG_VERSION,
            tracks: library.tracks().to_vec(),
            playlists: library.playlists().to_vec(),
            projects: projects.projects().to_vec(),
        }
    }

    pub fn into_stores(self) -> (LibraryStore, ProjectStore) {
        (
            LibraryStore::with_contents(self.tracks, self.playlists),
            ProjectStore::with_projects(self.projects),
        )
    }
}

/// `library.json` in the data directory.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CATALOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty catalog.
    pub fn load(&self) -> Result<CatalogSnapshot, LibraryError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(CatalogSnapshot {
                    version: CATALOG_VERSION,
                    ..CatalogSnapshot::default()
                });
            }
            Err(source) => return Err(self.io_error(source)),
        };
        let snapshot: CatalogSnapshot = serde_json::from_str(&text)?;
        debug!(
            tracks = snapshot.tracks.len(),
            projects = snapshot.projects.len(),
            "catalog loaded"
        );
        Ok(snapshot)
    }

    pub fn save(&self, snapshot: &CatalogSnapshot) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let text = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> LibraryError {
        LibraryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
