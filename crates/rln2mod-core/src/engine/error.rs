use crate::core::io::star::StarError;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures while turning one particle table into pixel coordinates.
///
/// Row numbers in messages are 1-based, counted from the first data row.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File contains no data blocks")]
    EmptyDocument,

    #[error("Required column '{column}' is missing from data block '{block}'")]
    MissingColumn { column: &'static str, block: String },

    #[error("Invalid pixel size '{value}' in row {row}: pixel size must be a positive number")]
    ArithmeticFault { row: usize, value: String },

    #[error("Value '{value}' in column '{column}' at row {row} is not a finite number")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: String,
    },
}

/// Failures of the external point-to-model converter.
#[derive(Debug, Error)]
pub enum ConverterError {
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' failed with {status}{}", stderr_suffix(.stderr))]
    NonZeroExit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Failures while processing a single input file.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Input path '{path}' has no usable file name", path = path.display())]
    InvalidName { path: PathBuf },

    #[error(
        "Point list for '{path}' would overwrite the input table",
        path = path.display()
    )]
    InputCollision { path: PathBuf },

    #[error("Failed to read particle table: {0}")]
    Table(#[from] StarError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Failed to write point list '{path}': {source}", path = path.display())]
    PointList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Point-to-model conversion failed: {0}")]
    Converter(#[from] ConverterError),

    #[error(
        "Failed to move '{from}' to '{to}': {source}",
        from = from.display(),
        to = to.display()
    )]
    Relocation {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl JobError {
    /// Whether the failure makes the shared output directory unusable, ending the whole run.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, JobError::Relocation { .. })
    }
}

/// Failures that end a batch run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to scan working directory '{path}': {source}", path = path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to create output directory '{path}': {source}", path = path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Batch aborted while processing '{input}': {source}", input = input.display())]
    Fatal {
        input: PathBuf,
        #[source]
        source: JobError,
    },
}
