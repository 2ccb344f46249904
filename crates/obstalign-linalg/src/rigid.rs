//! Rigid alignment utilities (2D Kabsch / Procrustes)

use glam::{DMat2, DVec2};

use crate::svd::svd2;
use crate::LinalgError;

/// Planar rigid transform mapping source points to destination points as
/// `dst = rotation * src + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rigid2 {
    /// Proper rotation matrix (determinant +1).
    pub rotation: DMat2,
    /// Translation applied after the rotation.
    pub translation: DVec2,
}

impl Rigid2 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: DMat2::IDENTITY,
        translation: DVec2::ZERO,
    };

    /// Rotation angle in radians, `atan2(R[1,0], R[0,0])`.
    pub fn angle(&self) -> f64 {
        self.rotation.x_axis.y.atan2(self.rotation.x_axis.x)
    }

    /// Apply the transform to a single point.
    #[inline]
    pub fn transform_point(&self, point: DVec2) -> DVec2 {
        self.rotation * point + self.translation
    }
}

/// Compute the centroid of a set of points.
///
/// # Arguments
///
/// * `points` - A non-empty set of points.
///
/// # Returns
///
/// The arithmetic mean of the points.
pub fn compute_centroid(points: &[DVec2]) -> Result<DVec2, LinalgError> {
    if points.is_empty() {
        return Err(LinalgError::EmptyInput);
    }
    Ok(points.iter().fold(DVec2::ZERO, |acc, &p| acc + p) / points.len() as f64)
}

/// Root mean square distance of the points to a center.
pub fn rms_spread(points: &[DVec2], center: DVec2) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum_sq = points
        .iter()
        .map(|&p| (p - center).length_squared())
        .sum::<f64>();
    (sum_sq / points.len() as f64).sqrt()
}

/// Compute the cross-covariance `H = Σ (src - src_mean) * (dst - dst_mean)^T`.
pub fn cross_covariance(
    points_src: &[DVec2],
    points_dst: &[DVec2],
    src_centroid: DVec2,
    dst_centroid: DVec2,
) -> DMat2 {
    points_src
        .iter()
        .zip(points_dst.iter())
        .fold(DMat2::ZERO, |h, (&src_pt, &dst_pt)| {
            let src_centered = src_pt - src_centroid;
            let dst_centered = dst_pt - dst_centroid;
            h + DMat2::from_cols(src_centered * dst_centered.x, src_centered * dst_centered.y)
        })
}

/// Compute the least-squares rigid transform between two planar point sets.
///
/// The algorithm:
/// 1. Compute centroids of both point sets
/// 2. Center both sets by subtracting their respective centroids
/// 3. Compute the cross-covariance matrix H = Σ[(p_src - p_src_mean) * (p_dst - p_dst_mean)^T]
/// 4. Compute the SVD of H = U * S * V^T
/// 5. Calculate rotation matrix R = V * U^T, negating the last column of V if
///    det(R) < 0 so that R is a proper rotation
/// 6. Calculate translation vector t = p_dst_mean - R * p_src_mean
///
/// For more details, see: Arun, K., Huang, T. S., and Blostein, S. D.
/// "Least-squares fitting of two 3-D point sets." IEEE PAMI, 1987.
///
/// The rotation is only meaningful when the source set has a non-zero spread
/// around its centroid; use [`rms_spread`] to check before trusting it.
///
/// # Arguments
///
/// * `points_src` - Source points.
/// * `points_dst` - Destination points (same length as `points_src`).
///
/// # Returns
///
/// The transform that maps `points_src` onto `points_dst`.
pub fn kabsch2d(points_src: &[DVec2], points_dst: &[DVec2]) -> Result<Rigid2, LinalgError> {
    if points_src.len() != points_dst.len() {
        return Err(LinalgError::MismatchedInputLengths {
            src: points_src.len(),
            dst: points_dst.len(),
        });
    }

    let src_centroid = compute_centroid(points_src)?;
    let dst_centroid = compute_centroid(points_dst)?;

    let h = cross_covariance(points_src, points_dst, src_centroid, dst_centroid);

    let svd = svd2(&h)?;
    let u = *svd.u();
    let mut v = *svd.v();

    let mut rotation = v * u.transpose();

    // Handle reflection case to ensure proper rotation matrix
    if rotation.determinant() < 0.0 {
        // flipping the last row of V^T is flipping the last column of V
        v.y_axis = -v.y_axis;
        rotation = v * u.transpose();
    }

    let translation = dst_centroid - rotation * src_centroid;

    Ok(Rigid2 {
        rotation,
        translation,
    })
}
