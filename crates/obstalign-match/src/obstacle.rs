use glam::DVec2;

use crate::{MatchError, SetSide};

/// An oriented bounding box in the shared planar frame.
///
/// Identifiers are opaque labels. They are carried through for traceability
/// and never take part in matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Opaque identifier from the originating data source.
    pub id: String,
    /// X coordinate of the box center in meters.
    pub x: f64,
    /// Y coordinate of the box center in meters.
    pub y: f64,
    /// Heading in radians, as provided by the source (not normalized).
    pub heading: f64,
    /// Box length in meters.
    pub length: f64,
    /// Box width in meters.
    pub width: f64,
    /// Box height in meters.
    pub height: f64,
}

impl Obstacle {
    /// Create a new obstacle.
    pub fn new(
        id: impl Into<String>,
        x: f64,
        y: f64,
        heading: f64,
        length: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            heading,
            length,
            width,
            height,
        }
    }

    /// Center of the box.
    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Box dimensions as `[length, width, height]`.
    #[inline]
    pub fn dimensions(&self) -> [f64; 3] {
        [self.length, self.width, self.height]
    }

    /// L1 distance between the dimensions of two boxes.
    pub fn dimension_diff(&self, other: &Obstacle) -> f64 {
        self.dimensions()
            .iter()
            .zip(other.dimensions().iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Whether every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.x,
            self.y,
            self.heading,
            self.length,
            self.width,
            self.height,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Reject an empty set or a set holding a non-finite record.
pub(crate) fn check_obstacles(obstacles: &[Obstacle], side: SetSide) -> Result<(), MatchError> {
    if obstacles.is_empty() {
        return Err(MatchError::EmptySet(side));
    }
    match obstacles.iter().position(|obs| !obs.is_finite()) {
        Some(index) => Err(MatchError::NonFiniteValue { side, index }),
        None => Ok(()),
    }
}
