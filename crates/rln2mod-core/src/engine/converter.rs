use super::error::ConverterError;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

pub const DEFAULT_CONVERTER_PROGRAM: &str = "point2model";

/// Turns a whitespace-separated point list into a model file.
pub trait ModelConverter: Send + Sync {
    fn convert(&self, points: &Path, model: &Path) -> Result<(), ConverterError>;
}

/// Runs an external program as `<program> [args...] <points> <model>`.
///
/// Arguments are passed as a vector, never through a shell, so paths containing
/// spaces or quotes reach the program unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalConverter {
    program: String,
    args: Vec<String>,
}

impl ExternalConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments placed before the two file paths.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for ExternalConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER_PROGRAM)
    }
}

impl ModelConverter for ExternalConverter {
    fn convert(&self, points: &Path, model: &Path) -> Result<(), ConverterError> {
        debug!(
            "Running {} {:?} {:?} {:?}",
            self.program, self.args, points, model
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(points)
            .arg(model)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ConverterError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{} stdout: {}", self.program, stdout.trim());
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(ConverterError::NonZeroExit {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
