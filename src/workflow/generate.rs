use reqwest::Url;
use serde_json::Value;
use tracing::info;

use crate::generation::{AudioFetcher, GeneratedMusic, GenerationRequest, MusicGenerator};
use crate::model::{Project, ProjectKind, ProjectStatus, Track};
use crate::storage::ObjectStore;
use crate::store::{LibraryStore, ProjectStore};

/// Artist recorded on generated tracks.
pub const GENERATED_ARTIST: &str = "AI Generated";

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub project_id: String,
    pub results: Vec<GeneratedMusic>,
    /// Ids of the tracks added to the library, in result order.
    pub track_ids: Vec<String>,
}

/// Generate music for `owner`, record a completed generation project and
/// put every result at the front of the library.
///
/// Each result is downloaded into `store` so the library track points at a
/// local copy; the project keeps the service's URLs. On failure, download
/// failures included, nothing is recorded.
pub fn run_generation<G: MusicGenerator + AudioFetcher + ?Sized>(
    generator: &G,
    store: &dyn ObjectStore,
    owner: &str,
    request: &GenerationRequest,
    projects: &mut ProjectStore,
    library: &mut LibraryStore,
) -> Result<GenerationOutcome, super::WorkflowError> {
    let results = generator.generate(request)?;
    let mut local_urls = Vec::with_capacity(results.len());
    for (i, music) in results.iter().enumerate() {
        let bytes = generator.fetch(&music.url)?;
        local_urls.push(store.put(owner, &download_name(&music.url, i), &bytes)?);
    }

    let mut project = Project::new(owner, request.title(), ProjectKind::Generation)
        .with_status(ProjectStatus::Completed)
        .with_setting("genre", optional(&request.genre))
        .with_setting("mood", optional(&request.mood))
        .with_setting("duration", request.duration_or_default());
    for (i, music) in results.iter().enumerate() {
        project = project.with_output(format!("variant_{}", i + 1), music.url.clone());
    }
    let project_id = project.id.clone();
    projects.add_project(project);

    // Added in reverse so the first result ends up first in the library.
    let mut track_ids = Vec::with_capacity(results.len());
    for (i, (music, local)) in results.iter().zip(local_urls).enumerate().rev() {
        let title = if i == 0 {
            music.title.clone()
        } else {
            format!("{} ({})", music.title, i + 1)
        };
        let tags = [request.genre.as_deref(), request.mood.as_deref(), Some("ai-generated")]
            .into_iter()
            .flatten()
            .filter(|t| !t.trim().is_empty());
        let track = Track::new(owner, title, GENERATED_ARTIST, local, music.duration).with_tags(tags);
        track_ids.push(track.id.clone());
        library.add_track(track);
    }
    track_ids.reverse();

    info!(project = %project_id, count = results.len(), "generation recorded");
    Ok(GenerationOutcome {
        project_id,
        results,
        track_ids,
    })
}

fn optional(value: &Option<String>) -> Value {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Value::from(v),
        _ => Value::Null,
    }
}

/// File name for the `i`th download: the URL's last path segment when it
/// looks like a file, `variant_{n}.mp3` otherwise.
fn download_name(url: &str, i: usize) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.path_segments()?.next_back().map(str::to_string))
        .filter(|name| name.contains('.') && !name.starts_with('.'))
        .unwrap_or_else(|| format!("variant_{}.mp3", i + 1))
}
