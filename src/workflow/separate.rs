use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SeparationSettings;
use crate::model::{Project, ProjectKind, ProjectPatch};
use crate::separation::{
    JobId, JobUpdate, SeparationError, SeparationOptions, SeparationProcessor, inspect_upload,
    wait_for_job,
};
use crate::storage::ObjectStore;
use crate::store::{Outcome, ProjectStore};

use super::WorkflowError;

/// A submitted separation and the project tracking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationJob {
    pub project_id: String,
    pub job: JobId,
}

/// Validate and upload `file`, submit it, and record a `processing` project.
///
/// Validation failures are returned before anything is uploaded.
pub fn start_separation<P: SeparationProcessor + ?Sized>(
    store: &dyn ObjectStore,
    processor: &mut P,
    owner: &str,
    file: &Path,
    options: &SeparationOptions,
    settings: &SeparationSettings,
    projects: &mut ProjectStore,
) -> Result<SeparationJob, WorkflowError> {
    let candidate = inspect_upload(file, &settings.accepted_extensions, settings.max_upload_bytes)?;
    let input_url = store.upload(owner, &candidate.path)?;
    let job = processor.submit(&input_url, options)?;

    let project = Project::new(owner, candidate.display_name(), ProjectKind::Separation)
        .with_input(input_url, candidate.file_name.clone())
        .with_setting("model", options.model.as_str())
        .with_setting("format", options.format.extension())
        .with_setting("quality", options.quality.as_str())
        .with_setting("job_id", job.0.clone());
    let project_id = project.id.clone();
    projects.add_project(project);

    info!(project = %project_id, %job, file = %candidate.file_name, "separation started");
    Ok(SeparationJob { project_id, job })
}

/// Fold a job snapshot into its project.
pub fn apply_job_update(projects: &mut ProjectStore, project_id: &str, update: &JobUpdate) -> Outcome {
    projects.update_project(project_id, &update.to_patch())
}

/// Poll `job` until it settles, keeping the project current.
///
/// Any error, cancellation included, marks the project `failed`.
pub fn separate_to_completion<P: SeparationProcessor + ?Sized>(
    processor: &mut P,
    job: &SeparationJob,
    interval: Duration,
    cancel: &AtomicBool,
    projects: &mut ProjectStore,
) -> Result<JobUpdate, WorkflowError> {
    let result = wait_for_job(processor, &job.job, interval, cancel, |update| {
        if !apply_job_update(projects, &job.project_id, update).applied() {
            debug!(project = %job.project_id, status = ?update.status(), "job update for a removed project");
        }
    });
    match result {
        Ok(update) => Ok(update),
        Err(err) => {
            warn!(project = %job.project_id, error = %err, "separation failed");
            let message = match &err {
                SeparationError::Cancelled => "cancelled".to_string(),
                other => other.to_string(),
            };
            if !projects.update_project(&job.project_id, &ProjectPatch::failed(message)).applied() {
                debug!(project = %job.project_id, "failure not recorded, project was removed");
            }
            Err(err.into())
        }
    }
}
