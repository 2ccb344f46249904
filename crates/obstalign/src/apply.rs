//! Repositioning of downstream geometry with a calibrated offset.
//!
//! Map and scenario rewriting tools consume only the offset and the rotation
//! angle from the calibration artifact. Rotations below
//! [`OffsetTransform::SMALL_ANGLE_THRESHOLD`] are skipped and points are only
//! translated. The shortcut lives here and never in the fitter.

use glam::{DMat2, DVec2};

use crate::io::CalibrationArtifact;

/// Translation plus optional rotation about the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetTransform {
    /// Translation in meters.
    pub offset: DVec2,
    /// Rotation in radians, applied before the translation.
    pub rotation: f64,
}

impl OffsetTransform {
    /// Rotations smaller than this (radians, about 0.57 degrees) are ignored.
    pub const SMALL_ANGLE_THRESHOLD: f64 = 0.01;

    /// Create a transform from an offset and a rotation.
    pub fn new(offset: DVec2, rotation: f64) -> Self {
        Self { offset, rotation }
    }

    /// Build the transform consumed by geometry rewriting.
    ///
    /// The offset is the mean raw per-pair offset and the rotation is the
    /// fitted rotation angle.
    pub fn from_artifact(artifact: &CalibrationArtifact) -> Self {
        let stats = &artifact.simple_offset_stats;
        Self {
            offset: DVec2::new(stats.dx_mean, stats.dy_mean),
            rotation: artifact.transformation.rotation_radians,
        }
    }

    /// Whether the rotation is small enough to be skipped.
    #[inline]
    pub fn is_translation_only(&self) -> bool {
        self.rotation.abs() < Self::SMALL_ANGLE_THRESHOLD
    }

    /// Transform a single point.
    pub fn transform_point(&self, point: DVec2) -> DVec2 {
        if self.is_translation_only() {
            point + self.offset
        } else {
            DMat2::from_angle(self.rotation) * point + self.offset
        }
    }

    /// Transform a set of points.
    pub fn transform_points(&self, points: &[DVec2]) -> Vec<DVec2> {
        points.iter().map(|&p| self.transform_point(p)).collect()
    }
}
