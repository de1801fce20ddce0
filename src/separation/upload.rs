use std::fs;
use std::path::{Path, PathBuf};

use super::SeparationError;

/// Largest upload accepted by default (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    M4a,
    Ogg,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [Self::Mp3, Self::Wav, Self::Flac, Self::M4a, Self::Ogg];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
            Self::M4a => "audio/x-m4a",
            Self::Ogg => "audio/ogg",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

/// A local file that passed upload checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub format: AudioFormat,
}

impl UploadCandidate {
    /// File name without its last extension.
    pub fn display_name(&self) -> &str {
        display_name(&self.file_name)
    }
}

/// Strip the last `.ext` from `file_name`, if there is one.
pub fn display_name(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    }
}

/// Check type and size of `path` before it is uploaded.
///
/// `accepted` lists allowed extensions; it is intersected with the formats
/// this module knows.
pub fn inspect_upload(
    path: &Path,
    accepted: &[String],
    max_bytes: u64,
) -> Result<UploadCandidate, SeparationError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let format = AudioFormat::from_extension(&ext)
        .filter(|_| accepted.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
        .ok_or_else(|| SeparationError::UnsupportedFormat(file_name.clone()))?;

    let meta = fs::metadata(path).map_err(|source| SeparationError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.len() > max_bytes {
        return Err(SeparationError::TooLarge {
            size: meta.len(),
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    Ok(UploadCandidate {
        path: path.to_path_buf(),
        file_name,
        size: meta.len(),
        format,
    })
}
