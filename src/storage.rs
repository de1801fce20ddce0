//! Object storage for uploaded audio.
//!
//! Objects are namespaced by owner and upload time:
//! `{owner}/{unix_millis}-{file_name}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::info;

/// Bucket uploaded source files go to.
pub const DEFAULT_BUCKET: &str = "audio-uploads";

const FILE_SCHEME: &str = "file://";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("`{0}` has no file name")]
    NoFileName(PathBuf),
    #[error("upload of {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Destination for uploads. Returns a public locator for the stored object.
pub trait ObjectStore {
    fn upload(&self, owner: &str, file: &Path) -> Result<String, StorageError>;

    /// Store `bytes` under `file_name`, e.g. audio fetched from a remote URL.
    fn put(&self, owner: &str, file_name: &str, bytes: &[u8]) -> Result<String, StorageError>;
}

/// Object key for `file_name` uploaded by `owner` at `unix_millis`.
pub fn object_path(owner: &str, unix_millis: i64, file_name: &str) -> String {
    format!("{owner}/{unix_millis}-{file_name}")
}

/// Turn a `file://` locator or a plain path into a filesystem path.
///
/// Remote URLs yield `None`.
pub fn local_path(locator: &str) -> Option<PathBuf> {
    if let Some(rest) = locator.strip_prefix(FILE_SCHEME) {
        return Some(PathBuf::from(rest));
    }
    if locator.contains("://") {
        return None;
    }
    Some(PathBuf::from(locator))
}

/// Stores objects as files under `root/bucket`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }
}

impl LocalObjectStore {
    fn destination(&self, owner: &str, file_name: &str) -> (String, PathBuf) {
        let key = object_path(owner, Utc::now().timestamp_millis(), file_name);
        let dest = self.bucket_dir().join(&key);
        (key, dest)
    }

    fn locator(dest: PathBuf) -> String {
        let dest = fs::canonicalize(&dest).unwrap_or(dest);
        format!("{FILE_SCHEME}{}", dest.display())
    }
}

fn create_parent(dest: &Path) -> io::Result<()> {
    match dest.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

impl ObjectStore for LocalObjectStore {
    fn upload(&self, owner: &str, file: &Path) -> Result<String, StorageError> {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::NoFileName(file.to_path_buf()))?;
        let (key, dest) = self.destination(owner, name);

        let io_err = |source| StorageError::Io {
            path: file.to_path_buf(),
            source,
        };
        create_parent(&dest).map_err(io_err)?;
        fs::copy(file, &dest).map_err(io_err)?;

        info!(owner, bucket = %self.bucket, %key, "object uploaded");
        Ok(Self::locator(dest))
    }

    fn put(&self, owner: &str, file_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StorageError::NoFileName(PathBuf::from(file_name)))?;
        let (key, dest) = self.destination(owner, name);

        let io_err = |source| StorageError::Io {
            path: dest.clone(),
            source,
        };
        create_parent(&dest).map_err(io_err)?;
        fs::write(&dest, bytes).map_err(io_err)?;

        info!(owner, bucket = %self.bucket, %key, size = bytes.len(), "object stored");
        Ok(Self::locator(dest))
    }
}
