use nalgebra::{Point3, Vector3};
use std::fmt;

/// The size of a reconstructed tomogram, in pixels along each axis.
///
/// Dimensions are supplied by the user rather than read from the particle table,
/// since RELION stores particle positions relative to the volume center and the
/// volume size itself lives with the tomogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TomogramDimensions {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl TomogramDimensions {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Returns the geometric center of the volume in pixels.
    ///
    /// Uses real division, so odd sizes land on half-pixel positions.
    pub fn center(&self) -> Vector3<f64> {
        Vector3::new(
            f64::from(self.x) / 2.0,
            f64::from(self.y) / 2.0,
            f64::from(self.z) / 2.0,
        )
    }
}

impl fmt::Display for TomogramDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// A particle position in tomogram pixel units, with the origin at the volume corner.
///
/// This is the convention expected by `point2model`. Values are computed once from a
/// table row and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCoordinate(Point3<f64>);

impl PixelCoordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Point3::new(x, y, z))
    }

    /// Re-origins a center-relative position given in Angstrom.
    ///
    /// # Arguments
    ///
    /// * `centered` - Position relative to the tomogram center, in Angstrom.
    /// * `pixel_size` - Angstrom per pixel for the particle's tilt series. Must be positive;
    ///   callers validate it before calling.
    /// * `dimensions` - Size of the tomogram in pixels.
    pub fn from_centered(
        centered: Vector3<f64>,
        pixel_size: f64,
        dimensions: &TomogramDimensions,
    ) -> Self {
        Self(Point3::from(centered / pixel_size + dimensions.center()))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_uses_real_division_for_odd_sizes() {
        let dims = TomogramDimensions::new(1023, 512, 7);
        assert_eq!(dims.center(), Vector3::new(511.5, 256.0, 3.5));
    }

    #[test]
    fn origin_maps_to_volume_center() {
        let dims = TomogramDimensions::new(1024, 1024, 512);
        let coord = PixelCoordinate::from_centered(Vector3::zeros(), 2.0, &dims);
        assert_eq!(coord, PixelCoordinate::new(512.0, 512.0, 256.0));
    }

    #[test]
    fn from_centered_matches_scalar_formula() {
        let dims = TomogramDimensions::new(928, 960, 300);
        let cases = [
            (Vector3::new(100.0, -50.0, 25.0), 2.0),
            (Vector3::new(-1234.5, 987.25, -0.125), 1.35),
            (Vector3::new(3.3e3, -7.7e2, 1.1e1), 10.56),
        ];

        for (centered, pixel_size) in cases {
            let coord = PixelCoordinate::from_centered(centered, pixel_size, &dims);
            let expected_x = centered.x / pixel_size + 928.0 / 2.0;
            let expected_y = centered.y / pixel_size + 960.0 / 2.0;
            let expected_z = centered.z / pixel_size + 300.0 / 2.0;
            assert!((coord.x() - expected_x).abs() < 1e-6);
            assert!((coord.y() - expected_y).abs() < 1e-6);
            assert!((coord.z() - expected_z).abs() < 1e-6);
        }
    }

    #[test]
    fn dimensions_display_as_triplet() {
        assert_eq!(
            TomogramDimensions::new(1024, 1024, 512).to_string(),
            "1024x1024x512"
        );
    }
}
