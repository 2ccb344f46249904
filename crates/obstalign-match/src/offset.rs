use glam::DVec2;

use crate::obstacle::check_obstacles;
use crate::{MatchError, Obstacle, SetSide};

fn centroid(obstacles: &[Obstacle]) -> DVec2 {
    obstacles
        .iter()
        .fold(DVec2::ZERO, |acc, obs| acc + obs.position())
        / obstacles.len() as f64
}

/// Estimate a coarse translation from the source set to the destination set.
///
/// The estimate is the difference of the unweighted centroids,
/// `centroid(dst) - centroid(src)`. It assumes the rotation between the two
/// sets is small and that their extents roughly overlap, so it is only a seed
/// for the matching cost.
///
/// # Arguments
///
/// * `src` - Source obstacles.
/// * `dst` - Destination obstacles.
///
/// # Returns
///
/// The translation, or [`MatchError::EmptySet`] if either set is empty and
/// [`MatchError::NonFiniteValue`] if a record holds NaN or infinite fields.
pub fn estimate_initial_offset(src: &[Obstacle], dst: &[Obstacle]) -> Result<DVec2, MatchError> {
    check_obstacles(src, SetSide::Source)?;
    check_obstacles(dst, SetSide::Destination)?;
    Ok(centroid(dst) - centroid(src))
}
