use super::error::ExtractionError;
use crate::core::io::star::StarDocument;
use crate::core::models::coordinate::{PixelCoordinate, TomogramDimensions};
use crate::core::models::table::ParticleTable;
use nalgebra::Vector3;
use tracing::{debug, warn};

/// The columns every particle table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    CenteredX,
    CenteredY,
    CenteredZ,
    PixelSize,
}

impl RequiredColumn {
    pub const ALL: [RequiredColumn; 4] = [
        RequiredColumn::CenteredX,
        RequiredColumn::CenteredY,
        RequiredColumn::CenteredZ,
        RequiredColumn::PixelSize,
    ];

    /// The RELION label for the column, without the leading underscore.
    pub const fn star_label(self) -> &'static str {
        match self {
            RequiredColumn::CenteredX => "rlnCenteredCoordinateXAngst",
            RequiredColumn::CenteredY => "rlnCenteredCoordinateYAngst",
            RequiredColumn::CenteredZ => "rlnCenteredCoordinateZAngst",
            RequiredColumn::PixelSize => "rlnTomoTiltSeriesPixelSize",
        }
    }
}

/// Picks the table to convert from a parsed document.
///
/// The first declared data block always wins, whatever it contains. Files whose
/// particles live in a later block will fail column validation or convert the wrong
/// rows, so ignored blocks are logged as a warning.
///
/// # Errors
///
/// Returns [`ExtractionError::EmptyDocument`] if the document has no data blocks.
pub fn resolve_table(document: &StarDocument) -> Result<ParticleTable, ExtractionError> {
    let first = document
        .first_block()
        .ok_or(ExtractionError::EmptyDocument)?;

    let ignored: Vec<&str> = document.block_names().skip(1).collect();
    if !ignored.is_empty() {
        warn!(
            "File has {} data blocks; using the first ('{}') and ignoring {:?}.",
            document.blocks.len(),
            first.name,
            ignored
        );
    }
    Ok(first.to_table())
}

/// Converts center-relative Angstrom positions into corner-origin pixel coordinates.
///
/// For every row, `pixel = centered / pixel_size + dimension / 2` on each axis, with the
/// pixel size taken from that row. Output order matches row order.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateExtractor {
    dimensions: TomogramDimensions,
}

struct ColumnIndices {
    x: usize,
    y: usize,
    z: usize,
    pixel_size: usize,
}

impl CoordinateExtractor {
    pub fn new(dimensions: TomogramDimensions) -> Self {
        Self { dimensions }
    }

    /// Resolves the document's table and converts it.
    ///
    /// # Errors
    ///
    /// See [`resolve_table`] and [`CoordinateExtractor::extract`].
    pub fn extract_document(
        &self,
        document: &StarDocument,
    ) -> Result<Vec<PixelCoordinate>, ExtractionError> {
        let table = resolve_table(document)?;
        self.extract(&table)
    }

    /// Converts every row of `table`.
    ///
    /// All required columns are checked before any row is read. A single bad row fails
    /// the whole table; no partial result is returned.
    ///
    /// # Errors
    ///
    /// * [`ExtractionError::MissingColumn`] if a required column is absent.
    /// * [`ExtractionError::ArithmeticFault`] if a pixel size is zero, negative, not a
    ///   number, or undefined.
    /// * [`ExtractionError::InvalidValue`] if a coordinate is not a finite number.
    pub fn extract(
        &self,
        table: &ParticleTable,
    ) -> Result<Vec<PixelCoordinate>, ExtractionError> {
        let columns = ColumnIndices {
            x: locate(table, RequiredColumn::CenteredX)?,
            y: locate(table, RequiredColumn::CenteredY)?,
            z: locate(table, RequiredColumn::CenteredZ)?,
            pixel_size: locate(table, RequiredColumn::PixelSize)?,
        };
        debug!(
            "Converting {} row(s) of block '{}' for a {} tomogram.",
            table.nrows(),
            table.name(),
            self.dimensions
        );

        (0..table.nrows())
            .map(|row| self.convert_row(table, &columns, row))
            .collect()
    }

    fn convert_row(
        &self,
        table: &ParticleTable,
        columns: &ColumnIndices,
        row: usize,
    ) -> Result<PixelCoordinate, ExtractionError> {
        let pixel_size = pixel_size_at(table, columns.pixel_size, row)?;
        let centered = Vector3::new(
            number_at(table, columns.x, row, RequiredColumn::CenteredX)?,
            number_at(table, columns.y, row, RequiredColumn::CenteredY)?,
            number_at(table, columns.z, row, RequiredColumn::CenteredZ)?,
        );
        Ok(PixelCoordinate::from_centered(
            centered,
            pixel_size,
            &self.dimensions,
        ))
    }
}

fn locate(table: &ParticleTable, column: RequiredColumn) -> Result<usize, ExtractionError> {
    table
        .column_index(column.star_label())
        .ok_or_else(|| ExtractionError::MissingColumn {
            column: column.star_label(),
            block: table.name().to_string(),
        })
}

fn pixel_size_at(table: &ParticleTable, col: usize, row: usize) -> Result<f64, ExtractionError> {
    let raw = table.get(row, col);
    match raw.map(str::parse::<f64>) {
        Some(Ok(value)) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ExtractionError::ArithmeticFault {
            row: row + 1,
            value: raw.unwrap_or("undefined").to_string(),
        }),
    }
}

fn number_at(
    table: &ParticleTable,
    col: usize,
    row: usize,
    column: RequiredColumn,
) -> Result<f64, ExtractionError> {
    let raw = table.get(row, col);
    match raw.map(str::parse::<f64>) {
        Some(Ok(value)) if value.is_finite() => Ok(value),
        _ => Err(ExtractionError::InvalidValue {
            column: column.star_label(),
            row: row + 1,
            value: raw.unwrap_or("undefined").to_string(),
        }),
    }
}
