use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::new_id;

use super::{JobId, JobUpdate, OutputFormat, SeparationError, SeparationOptions, SeparationProcessor, Stem, StemResult};

struct SimJob {
    submitted: Instant,
    stems: Vec<Stem>,
    format: OutputFormat,
}

/// Stands in for a hosted separation service: every job settles after a
/// fixed delay with `/output/{job}/{stem}.{ext}` outputs.
pub struct SimulatedProcessor {
    delay: Duration,
    failing: HashSet<Stem>,
    jobs: HashMap<JobId, SimJob>,
}

impl SimulatedProcessor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failing: HashSet::new(),
            jobs: HashMap::new(),
        }
    }

    /// Make `stem` fail in every job.
    pub fn with_failing_stem(mut self, stem: Stem) -> Self {
        self.failing.insert(stem);
        self
    }
}

impl SeparationProcessor for SimulatedProcessor {
    fn submit(&mut self, input_url: &str, options: &SeparationOptions) -> Result<JobId, SeparationError> {
        let job = JobId(new_id());
        debug!(%job, input_url, model = %options.model, "simulated separation submitted");
        self.jobs.insert(
            job.clone(),
            SimJob {
                submitted: Instant::now(),
                stems: options.model.stems(),
                format: options.format,
            },
        );
        Ok(job)
    }

    fn poll(&mut self, job: &JobId) -> Result<JobUpdate, SeparationError> {
        let sim = self
            .jobs
            .get(job)
            .ok_or_else(|| SeparationError::UnknownJob(job.to_string()))?;
        let elapsed = sim.submitted.elapsed();
        let done = elapsed >= self.delay;
        let progress = if self.delay.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.delay.as_secs_f32()).min(1.0)
        };

        let stems = sim
            .stems
            .iter()
            .map(|&stem| {
                let result = if !done {
                    StemResult::Pending
                } else if self.failing.contains(&stem) {
                    StemResult::Failed("stem extraction failed".into())
                } else {
                    StemResult::Ready(format!("/output/{job}/{stem}.{}", sim.format.extension()))
                };
                (stem, result)
            })
            .collect();

        Ok(JobUpdate {
            job: job.clone(),
            stems,
            progress,
        })
    }

    fn cancel(&mut self, job: &JobId) -> Result<(), SeparationError> {
        self.jobs
            .remove(job)
            .map(|_| ())
            .ok_or_else(|| SeparationError::UnknownJob(job.to_string()))
    }
}
