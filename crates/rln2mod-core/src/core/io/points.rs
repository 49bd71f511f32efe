use crate::core::models::coordinate::PixelCoordinate;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Digits after the decimal point; `point2model` input is read at this precision.
pub const POINT_PRECISION: usize = 6;

/// The plain-text point list handed to `point2model`.
///
/// One `x y z` line per point, each value fixed-point with six fractional digits,
/// no header, every line newline-terminated.
pub struct PointListFile;

impl PointListFile {
    pub fn write_to(points: &[PixelCoordinate], writer: &mut impl Write) -> io::Result<()> {
        for point in points {
            writeln!(writer, "{}", format_point(point))?;
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(points: &[PixelCoordinate], path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_to(points, &mut writer)?;
        writer.flush()
    }
}

/// Formats one point as a point-list line, without the newline.
pub fn format_point(point: &PixelCoordinate) -> String {
    format!(
        "{:.prec$} {:.prec$} {:.prec$}",
        point.x(),
        point.y(),
        point.z(),
        prec = POINT_PRECISION
    )
}
