use crate::engine::config::{FailurePolicy, PipelineConfig};
use crate::engine::converter::ModelConverter;
use crate::engine::discovery::discover_tables;
use crate::engine::error::{JobError, WorkflowError};
use crate::engine::extractor::CoordinateExtractor;
use crate::engine::job::{ConversionJob, ConvertedModel};
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub enum JobStatus {
    Converted(ConvertedModel),
    Failed(JobError),
    /// Not attempted because an earlier failure aborted the batch.
    Skipped,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub input: PathBuf,
    pub status: JobStatus,
}

/// Per-file outcomes of a batch, in discovery order.
#[derive(Debug)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn converted(&self) -> impl Iterator<Item = &ConvertedModel> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            JobStatus::Converted(model) => Some(model),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &JobError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            JobStatus::Failed(err) => Some((o.input.as_path(), err)),
            _ => None,
        })
    }

    pub fn converted_count(&self) -> usize {
        self.converted().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, JobStatus::Skipped))
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

/// Converts every particle table found in the working directory.
///
/// The output directory is created only once at least one table has been found.
/// Per-file failures are recorded in the report. Under [`FailurePolicy::Abort`] the
/// first failure marks all files not yet started as skipped.
///
/// # Errors
///
/// Returns a [`WorkflowError`] when the working directory cannot be scanned, the
/// output directory cannot be created, or a job fails in a way that leaves the
/// output directory unusable.
#[instrument(skip_all, name = "convert_workflow")]
pub fn run<C: ModelConverter + ?Sized>(
    config: &PipelineConfig,
    converter: &C,
    reporter: &ProgressReporter,
) -> Result<BatchReport, WorkflowError> {
    // === Phase 1: Discovery ===
    reporter.report(Progress::PhaseStart { name: "Discovery" });
    let inputs = discover_tables(&config.working_dir, &config.discovery).map_err(|source| {
        WorkflowError::Discovery {
            path: config.working_dir.clone(),
            source,
        }
    })?;
    reporter.report(Progress::PhaseFinish);

    if inputs.is_empty() {
        warn!("No particle tables found in {:?}.", config.working_dir);
        return Ok(BatchReport {
            output_dir: config.output_dir.clone(),
            outcomes: Vec::new(),
        });
    }

    fs::create_dir_all(&config.output_dir).map_err(|source| WorkflowError::OutputDirectory {
        path: config.output_dir.clone(),
        source,
    })?;

    // === Phase 2: Conversion ===
    reporter.report(Progress::PhaseStart { name: "Conversion" });
    reporter.report(Progress::BatchStart {
        total_files: inputs.len() as u64,
    });
    info!(
        "Converting {} file(s) for a {} tomogram into {:?}.",
        inputs.len(),
        config.dimensions,
        config.output_dir
    );

    let batch = Batch {
        config,
        extractor: CoordinateExtractor::new(config.dimensions),
        converter,
        reporter,
        aborted: AtomicBool::new(false),
    };

    let outcomes = if config.parallel {
        inputs
            .par_iter()
            .map(|input| batch.process(input))
            .collect::<Vec<_>>()
    } else {
        let mut outcomes = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let outcome = batch.process(input);
            let fatal = matches!(&outcome.status, JobStatus::Failed(e) if e.is_run_fatal());
            outcomes.push(outcome);
            if fatal {
                break;
            }
        }
        outcomes
    };

    reporter.report(Progress::BatchFinish);
    reporter.report(Progress::PhaseFinish);

    let report = BatchReport {
        output_dir: config.output_dir.clone(),
        outcomes: escalate_fatal(outcomes)?,
    };
    info!(
        "Batch finished: {} converted, {} failed, {} skipped.",
        report.converted_count(),
        report.failed_count(),
        report.skipped_count()
    );
    Ok(report)
}

struct Batch<'a, C: ?Sized> {
    config: &'a PipelineConfig,
    extractor: CoordinateExtractor,
    converter: &'a C,
    reporter: &'a ProgressReporter<'a>,
    aborted: AtomicBool,
}

impl<C: ModelConverter + ?Sized> Batch<'_, C> {
    fn process(&self, input: &Path) -> JobOutcome {
        if self.aborted.load(Ordering::SeqCst) {
            return JobOutcome {
                input: input.to_path_buf(),
                status: JobStatus::Skipped,
            };
        }

        let name = display_name(input);
        self.reporter.report(Progress::FileStart { name: name.clone() });

        let result = ConversionJob::new(input, &self.config.working_dir, &self.config.output_dir)
            .and_then(|job| job.run(&self.extractor, self.converter));

        let status = match result {
            Ok(model) => {
                info!("{} -> {}", input.display(), model.model_path.display());
                self.reporter.report(Progress::Message(format!(
                    "{} \u{2192} {}",
                    name,
                    model.model_path.display()
                )));
                JobStatus::Converted(model)
            }
            Err(err) => {
                warn!("Failed to convert {}: {}", input.display(), err);
                if err.is_run_fatal() || self.config.failure_policy == FailurePolicy::Abort {
                    self.aborted.store(true, Ordering::SeqCst);
                }
                JobStatus::Failed(err)
            }
        };

        self.reporter.report(Progress::FileFinish {
            succeeded: matches!(status, JobStatus::Converted(_)),
        });
        JobOutcome {
            input: input.to_path_buf(),
            status,
        }
    }
}

/// Turns the first run-fatal failure, in discovery order, into a workflow error.
fn escalate_fatal(outcomes: Vec<JobOutcome>) -> Result<Vec<JobOutcome>, WorkflowError> {
    let mut kept = Vec::with_capacity(outcomes.len());
    for JobOutcome { input, status } in outcomes {
        match status {
            JobStatus::Failed(source) if source.is_run_fatal() => {
                return Err(WorkflowError::Fatal { input, source });
            }
            status => kept.push(JobOutcome { input, status }),
        }
    }
    Ok(kept)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
