use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use rln2mod::engine::config::DiscoveryPolicy;
use rln2mod::engine::progress::ProgressReporter;
use rln2mod::workflows::convert::{self, BatchReport, JobStatus};
use std::fmt::Write as _;
use tracing::{info, warn};

pub fn run(config: AppConfig, show_progress: bool) -> Result<()> {
    let AppConfig {
        pipeline,
        converter,
        jobs,
    } = config;

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Converting particle tables in {} for a {} tomogram...",
        pipeline.working_dir.display(),
        pipeline.dimensions
    );
    info!(
        "Invoking the conversion workflow with '{}' on {} thread(s)...",
        converter.program(),
        jobs
    );

    let report = convert::run(&pipeline, &converter, &reporter)?;

    if report.is_empty() {
        warn!("Workflow completed but found no particle tables.");
        let discovery = &pipeline.discovery;
        let fallback = match discovery.policy {
            DiscoveryPolicy::Fallback => format!(", then '*.{}'", discovery.table_extension),
            DiscoveryPolicy::Strict => String::new(),
        };
        println!(
            "No particle tables found in {} (looked for '*{}'{}).",
            pipeline.working_dir.display(),
            discovery.particle_suffix,
            fallback
        );
        return Ok(());
    }

    // A visible progress handler has already listed converted files.
    print!("{}", render_report(&report, !show_progress));

    if report.has_failures() {
        return Err(CliError::ConversionFailures {
            failed: report.failed_count(),
            total: report.outcomes.len(),
        });
    }
    Ok(())
}

/// One line per failed or skipped input in discovery order, followed by a summary line.
///
/// Converted inputs are listed too when `list_converted` is set.
fn render_report(report: &BatchReport, list_converted: bool) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let _ = match &outcome.status {
            JobStatus::Converted(_) if !list_converted => Ok(()),
            JobStatus::Converted(model) => writeln!(
                out,
                "✓ {} → {} ({} point(s))",
                outcome.input.display(),
                model.model_path.display(),
                model.point_count
            ),
            JobStatus::Failed(err) => writeln!(out, "✗ {}: {}", outcome.input.display(), err),
            JobStatus::Skipped => writeln!(out, "- {}: skipped", outcome.input.display()),
        };
    }
    let _ = writeln!(
        out,
        "{} converted, {} failed, {} skipped. Output: {}",
        report.converted_count(),
        report.failed_count(),
        report.skipped_count(),
        report.output_dir.display()
    );
    out
}
