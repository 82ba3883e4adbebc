// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point buffers
//!
//! Raw coordinate buffers arrive from the data source as flat `xyz` arrays
//! expressed in their local CRS. A depth-oriented CRS has its Z axis pointing
//! down, so the third coordinate is negated when the buffer is loaded.
//! [`PointBuffer::load`] consumes the raw buffer, which keeps the negation to
//! exactly one application per buffer.

use crate::{Error, Point3, Result};

/// Flat coordinate buffer as supplied by the ingestion layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPoints {
    /// Interleaved x, y, z values
    pub xyz: Vec<f64>,
    /// `true` when the local CRS Z axis points downward
    pub depth_oriented: bool,
}

impl RawPoints {
    pub fn new(xyz: Vec<f64>, depth_oriented: bool) -> Self {
        Self { xyz, depth_oriented }
    }

    /// Number of points described by the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.xyz.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xyz.is_empty()
    }
}

/// Points ready for use in realized geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuffer {
    points: Vec<Point3<f64>>,
}

impl PointBuffer {
    /// Convert a raw buffer, negating Z for depth-oriented coordinate systems
    pub fn load(raw: RawPoints) -> Result<Self> {
        if raw.xyz.len() % 3 != 0 {
            return Err(Error::MissingData(format!(
                "coordinate buffer holds {} values, not a multiple of 3",
                raw.xyz.len()
            )));
        }
        let z_sign = if raw.depth_oriented { -1.0 } else { 1.0 };
        let points = raw
            .xyz
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2] * z_sign))
            .collect();
        Ok(Self { points })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_depth_oriented_negates_z() {
        let raw = RawPoints::new(vec![1.0, 2.0, 1500.0, 3.0, 4.0, -10.0], true);
        let buffer = PointBuffer::load(raw).unwrap();
        assert_eq!(buffer.len(), 2);
        assert_relative_eq!(buffer.as_slice()[0].z, -1500.0);
        assert_relative_eq!(buffer.as_slice()[1].z, 10.0);
        assert_relative_eq!(buffer.as_slice()[1].x, 3.0);
    }

    #[test]
    fn test_elevation_keeps_z() {
        let raw = RawPoints::new(vec![0.0, 0.0, 25.0], false);
        let buffer = PointBuffer::load(raw).unwrap();
        assert_relative_eq!(buffer.as_slice()[0].z, 25.0);
    }

    #[test]
    fn test_truncated_buffer() {
        let raw = RawPoints::new(vec![0.0, 1.0], false);
        assert!(PointBuffer::load(raw).is_err());
    }
}
