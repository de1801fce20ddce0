use std::fs;

use tempfile::tempdir;

use super::resolve_source;
use crate::player::MediaError;

#[test]
fn file_urls_resolve_to_existing_paths() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("song.mp3");
    fs::write(&file, b"not real").unwrap();

    let url = format!("file://{}", file.display());
    assert_eq!(resolve_source(&url).unwrap(), file);
    assert_eq!(resolve_source(&file.display().to_string()).unwrap(), file);
}

#[test]
fn remote_urls_are_rejected() {
    let err = resolve_source("https://cdn.example.com/a.mp3").unwrap_err();
    assert!(matches!(err, MediaError::Load { ref url, .. } if url == "https://cdn.example.com/a.mp3"));
}

#[test]
fn missing_files_are_rejected() {
    let dir = tempdir().unwrap();
    let url = format!("file://{}", dir.path().join("gone.mp3").display());
    assert!(matches!(resolve_source(&url), Err(MediaError::Load { .. })));
}
