use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::model::{ProjectPatch, ProjectStatus};

use super::{SeparationError, SeparationOptions, Stem};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StemResult {
    Pending,
    Ready(String),
    Failed(String),
}

/// Snapshot of a job's stems.
#[derive(Debug, Clone, PartialEq)]
pub struct JobUpdate {
    pub job: JobId,
    pub stems: Vec<(Stem, StemResult)>,
    /// Fraction in `[0, 1]`.
    pub progress: f32,
}

impl JobUpdate {
    /// Every stem has produced an output or failed.
    pub fn is_settled(&self) -> bool {
        self.stems
            .iter()
            .all(|(_, r)| !matches!(r, StemResult::Pending))
    }

    /// `completed` once settled with at least one output, `failed` when
    /// settled with none, `processing` before that.
    pub fn status(&self) -> ProjectStatus {
        if !self.is_settled() {
            ProjectStatus::Processing
        } else if self.outputs().is_empty() {
            ProjectStatus::Failed
        } else {
            ProjectStatus::Completed
        }
    }

    pub fn outputs(&self) -> BTreeMap<String, String> {
        self.stems
            .iter()
            .filter_map(|(stem, r)| match r {
                StemResult::Ready(url) => Some((stem.as_str().to_string(), url.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(Stem, &str)> {
        self.stems
            .iter()
            .filter_map(|(stem, r)| match r {
                StemResult::Failed(msg) => Some((*stem, msg.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Project fields reflecting this update.
    pub fn to_patch(&self) -> ProjectPatch {
        let failures = self.failures();
        let error = (!failures.is_empty()).then(|| {
            failures
                .iter()
                .map(|(stem, msg)| format!("{stem}: {msg}"))
                .collect::<Vec<_>>()
                .join("; ")
        });
        ProjectPatch {
            status: Some(self.status()),
            output_files: Some(self.outputs()),
            failed_stems: Some(failures.iter().map(|(s, _)| s.as_str().to_string()).collect()),
            error: Some(error),
            ..ProjectPatch::default()
        }
    }
}

/// A backend that splits audio into stems asynchronously.
pub trait SeparationProcessor {
    fn submit(&mut self, input_url: &str, options: &SeparationOptions) -> Result<JobId, SeparationError>;
    fn poll(&mut self, job: &JobId) -> Result<JobUpdate, SeparationError>;
    fn cancel(&mut self, job: &JobId) -> Result<(), SeparationError>;
}

/// Poll `job` every `interval` until it settles or `cancel` is raised.
///
/// `on_update` sees every snapshot, including the final one.
pub fn wait_for_job<P: SeparationProcessor + ?Sized>(
    processor: &mut P,
    job: &JobId,
    interval: Duration,
    cancel: &AtomicBool,
    mut on_update: impl FnMut(&JobUpdate),
) -> Result<JobUpdate, SeparationError> {
    loop {
        if cancel.load(Ordering::Relaxed) {
            processor.cancel(job)?;
            info!(%job, "separation cancelled");
            return Err(SeparationError::Cancelled);
        }
        let update = processor.poll(job)?;
        on_update(&update);
        if update.is_settled() {
            info!(%job, status = update.status().as_str(), "separation settled");
            return Ok(update);
        }
        debug!(%job, progress = update.progress, "separation pending");
        thread::sleep(interval);
    }
}
