use super::converter::ModelConverter;
use super::error::JobError;
use super::extractor::CoordinateExtractor;
use crate::core::io::points::PointListFile;
use crate::core::io::star::StarFile;
use crate::core::io::traits::TableFile;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Artifacts produced for one successfully converted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedModel {
    pub input: PathBuf,
    pub model_path: PathBuf,
    /// Location of the point list after it was moved next to the model.
    pub points_path: PathBuf,
    pub point_count: usize,
}

/// The paths involved in converting one particle table.
///
/// The point list is written to the working directory as `<base>.txt`, the model
/// goes to `<output_dir>/<base>.mod`, and the point list follows it there once the
/// converter succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    input: PathBuf,
    base_name: String,
    points_path: PathBuf,
    model_path: PathBuf,
    output_dir: PathBuf,
}

impl ConversionJob {
    /// # Errors
    ///
    /// Returns [`JobError::InvalidName`] when the input has no UTF-8 file stem, and
    /// [`JobError::InputCollision`] when the point list would overwrite the input.
    pub fn new(input: &Path, working_dir: &Path, output_dir: &Path) -> Result<Self, JobError> {
        let base_name = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| JobError::InvalidName {
                path: input.to_path_buf(),
            })?
            .to_string();

        let points_path = working_dir.join(format!("{base_name}.txt"));
        if points_path == input {
            return Err(JobError::InputCollision {
                path: input.to_path_buf(),
            });
        }

        Ok(Self {
            input: input.to_path_buf(),
            points_path,
            model_path: output_dir.join(format!("{base_name}.mod")),
            output_dir: output_dir.to_path_buf(),
            base_name,
        })
    }

    pub fn relocated_points_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.txt", self.base_name))
    }

    /// Reads, converts, writes the point list, invokes the converter and relocates
    /// the point list, in that order. Stops at the first failing step.
    ///
    /// Nothing is written when reading or extraction fails. When the converter fails
    /// the point list stays in the working directory.
    pub fn run<C: ModelConverter + ?Sized>(
        self,
        extractor: &CoordinateExtractor,
        converter: &C,
    ) -> Result<ConvertedModel, JobError> {
        debug!("Reading particle table {:?}.", self.input);
        let document = StarFile::read_from_path(&self.input)?;
        let points = extractor.extract_document(&document)?;
        if points.is_empty() {
            warn!(
                "{:?} contains no particles; writing an empty point list.",
                self.input
            );
        }

        PointListFile::write_to_path(&points, &self.points_path).map_err(|source| {
            JobError::PointList {
                path: self.points_path.clone(),
                source,
            }
        })?;
        debug!("Wrote {} point(s) to {:?}.", points.len(), self.points_path);

        converter.convert(&self.points_path, &self.model_path)?;

        let destination = self.relocated_points_path();
        relocate(&self.points_path, &destination).map_err(|source| JobError::Relocation {
            from: self.points_path.clone(),
            to: destination.clone(),
            source,
        })?;

        Ok(ConvertedModel {
            input: self.input,
            model_path: self.model_path,
            points_path: destination,
            point_count: points.len(),
        })
    }
}

/// Moves `from` to `to`, replacing an existing file.
///
/// Falls back to copy and remove when the two paths are on different filesystems.
fn relocate(from: &Path, to: &Path) -> io::Result<()> {
    if from == to {
        return Ok(());
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Rename across filesystems; copying {:?} to {:?}.", from, to);
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
