use std::cell::Cell;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use super::*;
use crate::config::SeparationSettings;
use crate::generation::{AudioFetcher, GeneratedMusic, GenerationError, GenerationRequest, MusicGenerator};
use crate::model::ProjectStatus;
use crate::separation::{SeparationOptions, SeparationProcessor, SimulatedProcessor, Stem};
use crate::storage::{LocalObjectStore, local_path};
use crate::store::{LibraryStore, ProjectStore};

struct CannedGenerator {
    urls: Vec<&'static str>,
    calls: Cell<usize>,
    unreachable: Option<&'static str>,
}

impl AudioFetcher for CannedGenerator {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        if self.unreachable == Some(url) {
            return Err(GenerationError::Api {
                status: 404,
                message: format!("{url} not found"),
            });
        }
        Ok(format!("audio from {url}").into_bytes())
    }
}

impl MusicGenerator for CannedGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedMusic>, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        request.validate()?;
        if self.urls.is_empty() {
            return Err(GenerationError::NoMusicGenerated);
        }
        Ok(self
            .urls
            .iter()
            .enumerate()
            .map(|(i, url)| GeneratedMusic {
                id: format!("g{i}"),
                url: url.to_string(),
                title: request.title(),
                duration: request.duration_or_default(),
            })
            .collect())
    }
}

fn generator(urls: Vec<&'static str>) -> CannedGenerator {
    CannedGenerator {
        urls,
        calls: Cell::new(0),
        unreachable: None,
    }
}

#[test]
fn generation_records_project_and_tracks() {
    let gen_ = generator(vec!["https://cdn/1.mp3", "https://cdn/2.mp3"]);
    let root = tempfile::tempdir().unwrap();
    let store = LocalObjectStore::new(root.path(), "generated-audio");
    let mut projects = ProjectStore::new();
    let mut library = LibraryStore::new();
    let request = GenerationRequest::new("rainy jazz night")
        .with_genre("jazz")
        .with_mood("relaxed")
        .with_duration(90);

    let outcome = run_generation(&gen_, &store, "u1", &request, &mut projects, &mut library).unwrap();

    let project = projects.project(&outcome.project_id).unwrap();
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.name, "rainy jazz night");
    assert_eq!(project.setting_str("genre"), Some("jazz"));
    assert_eq!(project.settings["duration"], 90);
    assert_eq!(project.output_files["variant_2"], "https://cdn/2.mp3");

    let titles: Vec<&str> = library.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["rainy jazz night", "rainy jazz night (2)"]);
    assert_eq!(library.tracks()[0].id, outcome.track_ids[0]);
    assert_eq!(library.tracks()[0].artist, GENERATED_ARTIST);
    assert!(library.tracks()[0].tags.contains(&"jazz".to_string()));
    assert_eq!(library.tracks()[1].duration, 90);
}

#[test]
fn generated_tracks_point_at_local_copies() {
    let gen_ = generator(vec!["https://cdn.example/songs/abc.mp3?sig=1", "https://cdn.example/render"]);
    let root = tempfile::tempdir().unwrap();
    let store = LocalObjectStore::new(root.path(), "generated-audio");
    let mut projects = ProjectStore::new();
    let mut library = LibraryStore::new();

    let outcome =
        run_generation(&gen_, &store, "u1", &GenerationRequest::new("lofi"), &mut projects, &mut library).unwrap();

    let first = &library.tracks()[0];
    assert!(first.file_url.starts_with("file://"));
    assert!(first.file_url.ends_with("-abc.mp3"));
    let stored = local_path(&first.file_url).unwrap();
    assert_eq!(
        std::fs::read(stored).unwrap(),
        b"audio from https://cdn.example/songs/abc.mp3?sig=1"
    );
    assert!(library.tracks()[1].file_url.ends_with("-variant_2.mp3"));

    let project = projects.project(&outcome.project_id).unwrap();
    assert_eq!(project.output_files["variant_1"], "https://cdn.example/songs/abc.mp3?sig=1");
    assert_eq!(outcome.results[1].url, "https://cdn.example/render");
}

#[test]
fn failed_download_records_nothing() {
    let gen_ = CannedGenerator {
        unreachable: Some("https://cdn/2.mp3"),
        ..generator(vec!["https://cdn/1.mp3", "https://cdn/2.mp3"])
    };
    let root = tempfile::tempdir().unwrap();
    let store = LocalObjectStore::new(root.path(), "generated-audio");
    let mut projects = ProjectStore::new();
    let mut library = LibraryStore::new();

    let err = run_generation(&gen_, &store, "u1", &GenerationRequest::new("x"), &mut projects, &mut library)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Generation(GenerationError::Api { status: 404, .. })));
    assert!(projects.projects().is_empty());
    assert!(library.tracks().is_empty());
}

#[test]
fn failed_generation_records_nothing() {
    let gen_ = generator(Vec::new());
    let root = tempfile::tempdir().unwrap();
    let store = LocalObjectStore::new(root.path(), "generated-audio");
    let mut projects = ProjectStore::new();
    let mut library = LibraryStore::new();
    let err = run_generation(&gen_, &store, "u1", &GenerationRequest::new("x"), &mut projects, &mut library)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Generation(GenerationError::NoMusicGenerated)));
    assert!(projects.projects().is_empty());
    assert!(library.tracks().is_empty());
}

struct Fixture {
    _src: tempfile::TempDir,
    _root: tempfile::TempDir,
    file: std::path::PathBuf,
    store: LocalObjectStore,
}

fn fixture(name: &str, bytes: usize) -> Fixture {
    let src = tempfile::tempdir().unwrap();
    let file = src.path().join(name);
    std::fs::write(&file, vec![1u8; bytes]).unwrap();
    let root = tempfile::tempdir().unwrap();
    let store = LocalObjectStore::new(root.path(), "audio-uploads");
    Fixture {
        _src: src,
        _root: root,
        file,
        store,
    }
}

#[test]
fn separation_moves_project_from_processing_to_completed() {
    let fx = fixture("Live Take.mp3", 64);
    let mut processor = SimulatedProcessor::new(Duration::ZERO);
    let mut projects = ProjectStore::new();
    let settings = SeparationSettings::default();

    let job = start_separation(
        &fx.store,
        &mut processor,
        "u1",
        &fx.file,
        &SeparationOptions::default(),
        &settings,
        &mut projects,
    )
    .unwrap();

    let project = projects.project(&job.project_id).unwrap();
    assert_eq!(project.status, ProjectStatus::Processing);
    assert_eq!(project.name, "Live Take");
    assert_eq!(project.input_file_name, "Live Take.mp3");
    assert!(project.input_file_url.starts_with("file://"));
    assert_eq!(project.setting_str("model"), Some("full"));
    assert_eq!(project.setting_str("job_id"), Some(job.job.0.as_str()));

    let cancel = AtomicBool::new(false);
    let update =
        separate_to_completion(&mut processor, &job, Duration::from_millis(1), &cancel, &mut projects).unwrap();
    assert!(update.is_settled());

    let project = projects.project(&job.project_id).unwrap();
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.output_files.len(), 4);
    assert!(project.failed_stems.is_empty());
}

#[test]
fn partial_separation_keeps_successful_stems() {
    let fx = fixture("song.wav", 8);
    let mut processor = SimulatedProcessor::new(Duration::ZERO).with_failing_stem(Stem::Bass);
    let mut projects = ProjectStore::new();
    let job = start_separation(
        &fx.store,
        &mut processor,
        "u1",
        &fx.file,
        &SeparationOptions::default(),
        &SeparationSettings::default(),
        &mut projects,
    )
    .unwrap();
    let cancel = AtomicBool::new(false);
    separate_to_completion(&mut processor, &job, Duration::from_millis(1), &cancel, &mut projects).unwrap();

    let project = projects.project(&job.project_id).unwrap();
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.output_files.len(), 3);
    assert_eq!(project.failed_stems, vec!["bass".to_string()]);
    assert!(project.error.as_deref().unwrap().contains("bass"));
}

#[test]
fn cancelled_separation_marks_project_failed() {
    let fx = fixture("song.ogg", 8);
    let mut processor = SimulatedProcessor::new(Duration::from_secs(3600));
    let mut projects = ProjectStore::new();
    let job = start_separation(
        &fx.store,
        &mut processor,
        "u1",
        &fx.file,
        &SeparationOptions::default(),
        &SeparationSettings::default(),
        &mut projects,
    )
    .unwrap();

    let cancel = AtomicBool::new(true);
    let err = separate_to_completion(&mut processor, &job, Duration::from_millis(1), &cancel, &mut projects)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Separation(crate::separation::SeparationError::Cancelled)));
    let project = projects.project(&job.project_id).unwrap();
    assert_eq!(project.status, ProjectStatus::Failed);
    assert_eq!(project.error.as_deref(), Some("cancelled"));
}

#[test]
fn invalid_upload_is_rejected_before_anything_is_stored() {
    let fx = fixture("too-big.flac", 2048);
    let mut processor = SimulatedProcessor::new(Duration::ZERO);
    let mut projects = ProjectStore::new();
    let settings = SeparationSettings {
        max_upload_bytes: 1024,
        ..SeparationSettings::default()
    };
    let err = start_separation(
        &fx.store,
        &mut processor,
        "u1",
        &fx.file,
        &SeparationOptions::default(),
        &settings,
        &mut projects,
    )
    .unwrap_err();
    assert!(matches!(err, WorkflowError::Separation(ref e) if e.is_validation()));
    assert!(projects.projects().is_empty());
    assert!(!fx.store.bucket_dir().exists());
}

#[test]
fn separation_of_a_removed_project_settles_without_recording() {
    let fx = fixture("song.mp3", 8);
    let mut processor = SimulatedProcessor::new(Duration::ZERO);
    let mut projects = ProjectStore::new();
    let job = start_separation(
        &fx.store,
        &mut processor,
        "u1",
        &fx.file,
        &SeparationOptions::default(),
        &SeparationSettings::default(),
        &mut projects,
    )
    .unwrap();
    assert!(projects.delete_project(&job.project_id).applied());

    let cancel = AtomicBool::new(false);
    let update =
        separate_to_completion(&mut processor, &job, Duration::from_millis(1), &cancel, &mut projects).unwrap();
    assert!(update.is_settled());
    assert!(projects.projects().is_empty());
    assert_eq!(apply_job_update(&mut projects, &job.project_id, &update), crate::store::Outcome::Absent);

    let mut slow_processor = SimulatedProcessor::new(Duration::from_secs(3600));
    let slow = SeparationJob {
        job: slow_processor.submit("in", &SeparationOptions::default()).unwrap(),
        ..job
    };
    let cancel = AtomicBool::new(true);
    let err = separate_to_completion(&mut slow_processor, &slow, Duration::from_millis(1), &cancel, &mut projects)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Separation(crate::separation::SeparationError::Cancelled)));
    assert!(projects.projects().is_empty());
}
