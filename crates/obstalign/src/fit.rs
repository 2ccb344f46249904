use glam::{DMat2, DVec2};
use obstalign_linalg::{
    rigid::{compute_centroid, cross_covariance, kabsch2d, rms_spread, Rigid2},
    stats::mean_std,
    svd::svd2,
    LinalgError,
};
use obstalign_match::{Match, Obstacle, SetSide};
use serde::{Deserialize, Serialize};

/// Point sets with less spread than this (meters, RMS around the centroid)
/// carry no rotation information.
const MIN_SPREAD: f64 = 1e-9;

/// A cross-covariance whose largest singular value is below this fraction of
/// `k * spread_src * spread_dst` leaves the rotation unconstrained.
const MIN_CORRELATION: f64 = 1e-12;

/// Error types for the rigid transform fitter.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FitError {
    /// The fitter was given no matches.
    #[error("Cannot fit a transform without matches")]
    NoMatches,

    /// A match refers to an obstacle that does not exist.
    #[error("Match index {index} is out of range for the {side} set of size {len}")]
    MatchIndexOutOfRange {
        /// Set the index points into.
        side: SetSide,
        /// Offending index.
        index: usize,
        /// Size of that set.
        len: usize,
    },

    /// The rotation cannot be identified from the matched points.
    #[error("Rotation is underdetermined with {num_matches} matched pairs")]
    DegenerateFit {
        /// Number of matched pairs.
        num_matches: usize,
    },

    /// The linear algebra backend failed.
    #[error("Numerical failure while fitting: {0}")]
    Linalg(#[from] LinalgError),
}

/// How much of the transform the matched points determine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitConfidence {
    /// Rotation and translation are both determined by the data.
    #[default]
    Full,
    /// Only the translation is determined. There is a single match, the
    /// matched points coincide, or the two point sets are uncorrelated. The
    /// rotation is reported as identity.
    RotationUnderdetermined,
}

/// Rigid transform fitted to matched obstacle centers, with per-pair diagnostics.
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Proper rotation (determinant +1) mapping source onto destination.
    pub rotation: DMat2,
    /// Translation applied after the rotation.
    pub translation: DVec2,
    /// Rotation angle in radians, `atan2(R[1,0], R[0,0])`.
    pub angle: f64,
    /// Distance between each transformed source point and its destination,
    /// in match order.
    pub residuals: Vec<f64>,
    /// Raw per-pair offsets `dst - src`, without rotation.
    pub offsets: Vec<DVec2>,
    /// Component-wise mean of [`TransformResult::offsets`].
    pub offset_mean: DVec2,
    /// Component-wise population standard deviation of [`TransformResult::offsets`].
    pub offset_std: DVec2,
    /// Whether the rotation is supported by the data.
    pub confidence: FitConfidence,
}

impl TransformResult {
    /// Rotation angle in degrees.
    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    /// The fitted transform.
    pub fn rigid(&self) -> Rigid2 {
        Rigid2 {
            rotation: self.rotation,
            translation: self.translation,
        }
    }

    /// Number of matched pairs the fit used.
    pub fn num_pairs(&self) -> usize {
        self.residuals.len()
    }

    /// Fail with [`FitError::DegenerateFit`] unless the rotation is determined.
    pub fn ensure_well_posed(&self) -> Result<&Self, FitError> {
        match self.confidence {
            FitConfidence::Full => Ok(self),
            FitConfidence::RotationUnderdetermined => Err(FitError::DegenerateFit {
                num_matches: self.num_pairs(),
            }),
        }
    }
}

pub(crate) fn lookup(
    obstacles: &[Obstacle],
    index: usize,
    side: SetSide,
) -> Result<&Obstacle, FitError> {
    obstacles.get(index).ok_or(FitError::MatchIndexOutOfRange {
        side,
        index,
        len: obstacles.len(),
    })
}

/// Fit the rigid transform that aligns the matched source obstacles onto
/// their destination counterparts.
///
/// The rotation comes from a 2D Kabsch fit over the matched centers and is
/// always a proper rotation. When the matches cannot determine a rotation
/// (a single pair, or all points on one spot) the result keeps an identity
/// rotation with the centroid translation and is flagged
/// [`FitConfidence::RotationUnderdetermined`].
///
/// # Arguments
///
/// * `src` - Source obstacles.
/// * `dst` - Destination obstacles.
/// * `matches` - Non-empty list of matches indexing into `src` and `dst`.
///
/// # Returns
///
/// The fitted transform with residuals and raw offset statistics.
pub fn fit_transform(
    src: &[Obstacle],
    dst: &[Obstacle],
    matches: &[Match],
) -> Result<TransformResult, FitError> {
    if matches.is_empty() {
        return Err(FitError::NoMatches);
    }

    let mut points_src = Vec::with_capacity(matches.len());
    let mut points_dst = Vec::with_capacity(matches.len());
    for m in matches {
        points_src.push(lookup(src, m.src_index, SetSide::Source)?.position());
        points_dst.push(lookup(dst, m.dst_index, SetSide::Destination)?.position());
    }

    let src_centroid = compute_centroid(&points_src)?;
    let dst_centroid = compute_centroid(&points_dst)?;

    let spread_src = rms_spread(&points_src, src_centroid);
    let spread_dst = rms_spread(&points_dst, dst_centroid);
    let underdetermined =
        if matches.len() < 2 || spread_src < MIN_SPREAD || spread_dst < MIN_SPREAD {
            true
        } else {
            // the centered sets can still be uncorrelated, e.g. orthogonal segments
            let h = cross_covariance(&points_src, &points_dst, src_centroid, dst_centroid);
            let bound = matches.len() as f64 * spread_src * spread_dst;
            svd2(&h)?.s().x <= MIN_CORRELATION * bound
        };

    let (rigid, confidence) = if underdetermined {
        log::warn!(
            "Rotation is underdetermined by {} matched pair(s), keeping identity rotation",
            matches.len()
        );
        let rigid = Rigid2 {
            rotation: DMat2::IDENTITY,
            translation: dst_centroid - src_centroid,
        };
        (rigid, FitConfidence::RotationUnderdetermined)
    } else {
        (kabsch2d(&points_src, &points_dst)?, FitConfidence::Full)
    };

    let residuals = points_src
        .iter()
        .zip(points_dst.iter())
        .map(|(&s, &d)| rigid.transform_point(s).distance(d))
        .collect::<Vec<_>>();

    let offsets = points_src
        .iter()
        .zip(points_dst.iter())
        .map(|(&s, &d)| d - s)
        .collect::<Vec<_>>();
    let (dx_mean, dx_std) = mean_std(&offsets.iter().map(|o| o.x).collect::<Vec<_>>())?;
    let (dy_mean, dy_std) = mean_std(&offsets.iter().map(|o| o.y).collect::<Vec<_>>())?;

    let angle = rigid.angle();
    log::info!(
        "Fitted transform: t=({:.6}, {:.6}) m, theta={:.6} deg over {} pairs",
        rigid.translation.x,
        rigid.translation.y,
        angle.to_degrees(),
        matches.len()
    );

    Ok(TransformResult {
        rotation: rigid.rotation,
        translation: rigid.translation,
        angle,
        residuals,
        offsets,
        offset_mean: DVec2::new(dx_mean, dy_mean),
        offset_std: DVec2::new(dx_std, dy_std),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn obstacle(x: f64, y: f64) -> Obstacle {
        Obstacle::new("", x, y, 0.0, 4.0, 2.0, 1.0)
    }

    fn identity_matches(n: usize) -> Vec<Match> {
        (0..n)
            .map(|i| Match {
                src_index: i,
                dst_index: i,
                cost: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_single_match_is_flagged() -> Result<(), FitError> {
        let src = vec![obstacle(0.0, 0.0)];
        let dst = vec![obstacle(10.0, 10.0)];
        let result = fit_transform(&src, &dst, &identity_matches(1))?;
        assert_eq!(result.confidence, FitConfidence::RotationUnderdetermined);
        assert_relative_eq!(result.translation.x, 10.0);
        assert_relative_eq!(result.translation.y, 10.0);
        assert_relative_eq!(result.angle, 0.0);
        assert_relative_eq!(result.residuals[0], 0.0);
        assert_eq!(
            result.ensure_well_posed().unwrap_err(),
            FitError::DegenerateFit { num_matches: 1 }
        );
        Ok(())
    }

    #[test]
    fn test_coincident_points_are_flagged() -> Result<(), FitError> {
        let src = vec![obstacle(1.0, 1.0), obstacle(1.0, 1.0)];
        let dst = vec![obstacle(3.0, 0.0), obstacle(4.0, 2.0)];
        let result = fit_transform(&src, &dst, &identity_matches(2))?;
        assert_eq!(result.confidence, FitConfidence::RotationUnderdetermined);
        Ok(())
    }

    #[test]
    fn test_uncorrelated_points_are_flagged() -> Result<(), FitError> {
        // both sets spread out, but along orthogonal segments: H is zero
        let src = vec![
            obstacle(-1.0, 0.0),
            obstacle(1.0, 0.0),
            obstacle(0.0, 0.0),
            obstacle(0.0, 0.0),
        ];
        let dst = vec![
            obstacle(0.0, 0.0),
            obstacle(0.0, 0.0),
            obstacle(0.0, -1.0),
            obstacle(0.0, 1.0),
        ];
        let result = fit_transform(&src, &dst, &identity_matches(4))?;
        assert_eq!(result.confidence, FitConfidence::RotationUnderdetermined);
        assert_relative_eq!(result.angle, 0.0);
        assert_relative_eq!(result.translation.x, 0.0);
        assert_relative_eq!(result.translation.y, 0.0);
        assert_eq!(
            result.ensure_well_posed().unwrap_err(),
            FitError::DegenerateFit { num_matches: 4 }
        );
        Ok(())
    }

    #[test]
    fn test_rotation_recovery() -> Result<(), FitError> {
        let theta = 30f64.to_radians();
        let rotation = DMat2::from_angle(theta);
        let translation = DVec2::new(5.0, -3.0);
        let src = vec![obstacle(0.0, 0.0), obstacle(10.0, 0.0), obstacle(3.0, 8.0)];
        let dst = src
            .iter()
            .map(|o| {
                let p = rotation * o.position() + translation;
                obstacle(p.x, p.y)
            })
            .collect::<Vec<_>>();

        let result = fit_transform(&src, &dst, &identity_matches(3))?;
        assert_eq!(result.confidence, FitConfidence::Full);
        assert_relative_eq!(result.angle_degrees(), 30.0, epsilon = 1e-6);
        assert_relative_eq!(result.translation.x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(result.translation.y, -3.0, epsilon = 1e-6);
        for r in &result.residuals {
            assert_relative_eq!(*r, 0.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_simple_offset_stats() -> Result<(), FitError> {
        let src = vec![obstacle(0.0, 0.0), obstacle(10.0, 0.0)];
        let dst = vec![obstacle(1.0, 2.0), obstacle(13.0, 2.0)];
        let result = fit_transform(&src, &dst, &identity_matches(2))?;
        assert_relative_eq!(result.offset_mean.x, 2.0);
        assert_relative_eq!(result.offset_mean.y, 2.0);
        assert_relative_eq!(result.offset_std.x, 1.0);
        assert_relative_eq!(result.offset_std.y, 0.0);
        Ok(())
    }

    #[test]
    fn test_errors() {
        let src = vec![obstacle(0.0, 0.0)];
        assert_eq!(
            fit_transform(&src, &src, &[]).unwrap_err(),
            FitError::NoMatches
        );
        let bad = vec![Match {
            src_index: 0,
            dst_index: 4,
            cost: 0.0,
        }];
        assert_eq!(
            fit_transform(&src, &src, &bad).unwrap_err(),
            FitError::MatchIndexOutOfRange {
                side: SetSide::Destination,
                index: 4,
                len: 1
            }
        );
    }
}
