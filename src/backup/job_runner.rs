use crate::backup::backup_job::BackupJob;
use crate::backup::config_translator::RunOptions;
use crate::backup::executor::{CommandExecutor, SystemExecutor, ToolStatus};
use crate::backup::result_error::error::Error;
use crate::backup::result_error::WithJobContext;
use crate::backup::validate::PathPresence;

use derive_more::Display;
use tracing::{debug, error, info, warn};

/// Why a job was not handed to the external tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum SkipReason {
    #[display("Path is invalid, source does not exist")]
    SourceMissing,
    #[display("Path is invalid, destination does not exist")]
    DestinationMissing,
    #[display("Path is invalid, neither source nor destination exists")]
    BothMissing,
}

impl SkipReason {
    fn from_presence(presence: PathPresence) -> Option<Self> {
        match (presence.source, presence.destination) {
            (true, true) => None,
            (false, true) => Some(SkipReason::SourceMissing),
            (true, false) => Some(SkipReason::DestinationMissing),
            (false, false) => Some(SkipReason::BothMissing),
        }
    }
}

#[derive(Debug)]
pub enum JobOutcome {
    /// Paths were missing, the tool was never started.
    Skipped(SkipReason),
    /// The tool ran to completion, whatever its exit status.
    Completed(ToolStatus),
    /// The tool could not be started.
    Failed(Error),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed(status) if status.success())
    }
}

#[derive(Debug)]
pub struct JobReport {
    pub label: String,
    pub outcome: JobOutcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.outcome.is_success()).count()
    }

    /// Jobs that ran with a nonzero status or could not be started.
    pub fn failed(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| match &j.outcome {
                JobOutcome::Completed(status) => !status.success(),
                JobOutcome::Failed(_) => true,
                JobOutcome::Skipped(_) => false,
            })
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| matches!(j.outcome, JobOutcome::Skipped(_)))
            .count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.jobs.iter().all(|j| j.outcome.is_success())
    }

    /// Process exit code for this run. Without `strict` every completed run exits 0.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.all_succeeded() {
            1
        } else {
            0
        }
    }
}

/// Runs jobs one after another, in order, each blocking until the tool exits.
///
/// A job that is skipped or fails never stops the jobs after it.
pub struct JobRunner<E: CommandExecutor = SystemExecutor> {
    executor: E,
    program: String,
}

impl JobRunner<SystemExecutor> {
    pub fn new(options: &RunOptions) -> Self {
        Self::with_executor(SystemExecutor, options.program().clone())
    }
}

impl<E: CommandExecutor> JobRunner<E> {
    pub fn with_executor<S: Into<String>>(executor: E, program: S) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn run(&self, jobs: &[BackupJob]) -> RunReport {
        let total = jobs.len();
        let report = RunReport {
            jobs: jobs
                .iter()
                .enumerate()
                .map(|(idx, job)| {
                    info!("Backup: {}/{} [{}]", idx + 1, total, job.label());
                    info!("Source={} Dest={}", job.source_path(), job.destination_path());
                    JobReport {
                        label: job.label().clone(),
                        outcome: self.run_job(job),
                    }
                })
                .collect(),
        };

        info!(
            "Finished {} backup job(s): {} succeeded, {} failed, {} skipped",
            total,
            report.succeeded(),
            report.failed(),
            report.skipped()
        );
        report
    }

    pub fn run_job(&self, job: &BackupJob) -> JobOutcome {
        let presence = PathPresence::check(job.source_path(), job.destination_path());
        if let Some(reason) = SkipReason::from_presence(presence) {
            warn!("Skipping job {:?}: {reason}", job.label());
            return JobOutcome::Skipped(reason);
        }

        debug!("Running: {}", job.command_line(&self.program));
        match self
            .executor
            .execute(&self.program, &job.rsync_args())
            .with_job_context(job.label().as_str(), "sync")
        {
            Ok(status) => {
                if status.success() {
                    info!("Job {:?} done", job.label());
                } else {
                    warn!("Job {:?} finished with {status}", job.label());
                }
                JobOutcome::Completed(status)
            }
            Err(e) => {
                error!("{e}");
                JobOutcome::Failed(e)
            }
        }
    }
}
