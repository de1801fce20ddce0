use std::borrow::Cow;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;

/// An audio file found on disk, with whatever its tags told us.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl ScannedFile {
    /// `Artist - Title`, or the title alone.
    pub fn display(&self) -> String {
        match self.artist.as_deref() {
            Some(a) => format!("{a} - {}", self.title),
            None => self.title.clone(),
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration
            .map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }
}

/// Lower-cased extensions accepted for import, without the leading dot.
struct Extensions(BTreeSet<String>);

impl Extensions {
    fn from_settings(settings: &LibrarySettings) -> Self {
        let set = settings
            .extensions
            .iter()
            .map(|raw| raw.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self(set)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.0.contains(&ext.to_lowercase()))
    }
}

fn dot_named(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn tag_text(value: Option<Cow<'_, str>>) -> Option<String> {
    let text = value?.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn read_file(path: &Path) -> ScannedFile {
    let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or("Untitled");
    let mut file = ScannedFile {
        path: path.to_path_buf(),
        title: stem.to_string(),
        artist: None,
        album: None,
        duration: None,
    };

    // Unreadable tags are not fatal; the file stem stands in for the title.
    let Ok(tagged) = lofty::read_from_path(path) else {
        return file;
    };
    file.duration = Some(tagged.properties().duration());
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());
    if let Some(tag) = tag {
        file.title = tag_text(tag.title()).unwrap_or(file.title);
        file.artist = tag_text(tag.artist());
        file.album = tag_text(tag.album());
    }
    file
}

/// Collect audio files under `dir`, sorted case-insensitively by display name.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<ScannedFile> {
    let extensions = Extensions::from_settings(settings);
    let max_depth = match (settings.recursive, settings.max_depth) {
        (false, _) => 1,
        (true, Some(depth)) => depth,
        (true, None) => usize::MAX,
    };

    let mut files: Vec<ScannedFile> = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .max_depth(max_depth)
        .into_iter()
        // The root is always walked, even when its own name starts with a dot.
        .filter_entry(|entry| entry.depth() == 0 || settings.include_hidden || !dot_named(entry))
        .flatten()
        .filter(|entry| entry.file_type().is_file() || entry.path().is_file())
        .filter(|entry| extensions.accepts(entry.path()))
        .map(|entry| read_file(entry.path()))
        .collect();

    files.sort_by_cached_key(|f| f.display().to_lowercase());
    files
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"placeholder audio").unwrap();
    }

    fn titles(dir: &Path, settings: &LibrarySettings) -> Vec<String> {
        scan(dir, settings).into_iter().map(|f| f.title).collect()
    }

    #[test]
    fn extensions_are_normalized_and_case_insensitive() {
        let settings = LibrarySettings {
            extensions: vec![" .FLAC".into(), "mp3".into(), "".into()],
            ..LibrarySettings::default()
        };
        let exts = Extensions::from_settings(&settings);
        assert!(exts.accepts(Path::new("x/song.flac")));
        assert!(exts.accepts(Path::new("x/song.Mp3")));
        assert!(!exts.accepts(Path::new("x/song.ogg")));
        assert!(!exts.accepts(Path::new("x/flac")));
    }

    #[test]
    fn untagged_files_are_titled_by_stem_and_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "zebra.WAV");
        touch(dir.path(), "Apple.m4a");
        touch(dir.path(), "cover.jpg");

        let files = scan(dir.path(), &LibrarySettings::default());
        let names: Vec<&str> = files.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(names, ["Apple", "zebra"]);
        assert!(files.iter().all(|f| f.artist.is_none() && f.album.is_none()));
        assert_eq!(files[1].duration_secs(), 0);
    }

    #[test]
    fn dot_entries_need_include_hidden() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "shown.ogg");
        touch(dir.path(), ".secret.ogg");
        touch(dir.path(), ".stash/buried.ogg");

        assert_eq!(titles(dir.path(), &LibrarySettings::default()), ["shown"]);

        let all = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(titles(dir.path(), &all).len(), 3);
    }

    #[test]
    fn depth_limits_apply() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.mp3");
        touch(dir.path(), "a/middle.mp3");
        touch(dir.path(), "a/b/bottom.mp3");

        assert_eq!(titles(dir.path(), &LibrarySettings::default()).len(), 3);

        let flat = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(titles(dir.path(), &flat), ["top"]);

        let two_levels = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        assert_eq!(titles(dir.path(), &two_levels), ["middle", "top"]);
    }

    #[test]
    fn display_prefers_artist() {
        let file = ScannedFile {
            path: PathBuf::from("x.mp3"),
            title: "Song".into(),
            artist: Some("Band".into()),
            album: None,
            duration: Some(Duration::from_millis(61_900)),
        };
        assert_eq!(file.display(), "Band - Song");
        assert_eq!(file.duration_secs(), 61);
    }
}
