//! Closed-form 2×2 Singular Value Decomposition.
//!
//! Any real 2×2 matrix splits into a scaled rotation plus a scaled
//! reflection:
//!
//! ```text
//! A = | E -H | + | F  G |
//!     | H  E |   | G -F |
//! ```
//!
//! with `E = (a00 + a11) / 2`, `F = (a00 - a11) / 2`, `G = (a10 + a01) / 2` and
//! `H = (a10 - a01) / 2`. Writing `Q = |(E, H)|` and `R = |(F, G)|`, the
//! decomposition is
//!
//! ```text
//! A = Rot(phi) * diag(Q + R, Q - R) * Rot(theta)
//! ```
//!
//! where `phi` and `theta` are half sums and differences of `atan2(H, E)` and
//! `atan2(G, F)`. No iteration is needed, so the result is exact up to
//! floating point rounding.
//!
//! # Example
//!
//! ```
//! use glam::DMat2;
//! use obstalign_linalg::svd::svd2;
//!
//! let a = DMat2::from_cols_array(&[3.0, 0.0, 0.0, -2.0]);
//! let svd = svd2(&a).unwrap();
//! assert!((svd.s().x - 3.0).abs() < 1e-12);
//! assert!((svd.s().y - 2.0).abs() < 1e-12);
//! ```

use glam::{DMat2, DVec2};

use crate::LinalgError;

/// Result of a 2×2 SVD such that `A = U * diag(s) * V^T`.
///
/// The singular values are non-negative and sorted in descending order.
#[derive(Debug, Clone, Copy)]
pub struct Svd2 {
    u: DMat2,
    s: DVec2,
    v: DMat2,
}

impl Svd2 {
    /// Left singular vectors as columns.
    #[inline]
    pub fn u(&self) -> &DMat2 {
        &self.u
    }

    /// Singular values, largest first.
    #[inline]
    pub fn s(&self) -> &DVec2 {
        &self.s
    }

    /// Right singular vectors as columns.
    #[inline]
    pub fn v(&self) -> &DMat2 {
        &self.v
    }

    /// Rebuild `U * diag(s) * V^T`.
    pub fn reconstruct(&self) -> DMat2 {
        self.u * DMat2::from_diagonal(self.s) * self.v.transpose()
    }
}

/// Compute the singular value decomposition of a 2×2 matrix.
///
/// # Arguments
///
/// * `a` - The matrix to decompose.
///
/// # Returns
///
/// The decomposition, or [`LinalgError::NonFiniteInput`] if `a` holds NaN or
/// infinite entries.
pub fn svd2(a: &DMat2) -> Result<Svd2, LinalgError> {
    if !a.is_finite() {
        return Err(LinalgError::NonFiniteInput);
    }

    // glam is column major: x_axis is the first column
    let (a00, a10) = (a.x_axis.x, a.x_axis.y);
    let (a01, a11) = (a.y_axis.x, a.y_axis.y);

    let e = 0.5 * (a00 + a11);
    let f = 0.5 * (a00 - a11);
    let g = 0.5 * (a10 + a01);
    let h = 0.5 * (a10 - a01);

    let q = e.hypot(h);
    let r = f.hypot(g);

    let a1 = g.atan2(f);
    let a2 = h.atan2(e);
    let theta = 0.5 * (a2 - a1);
    let phi = 0.5 * (a2 + a1);

    let mut u = DMat2::from_angle(phi);
    // V^T = Rot(theta)
    let v = DMat2::from_angle(-theta);

    let (s1, s2) = (q + r, q - r);
    let s = if s2 < 0.0 {
        // move the sign of the second singular value into U
        u.y_axis = -u.y_axis;
        DVec2::new(s1, -s2)
    } else {
        DVec2::new(s1, s2)
    };

    Ok(Svd2 { u, s, v })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_mat2_eq(a: &DMat2, b: &DMat2, epsilon: f64) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert_relative_eq!(x, y, epsilon = epsilon);
        }
    }

    fn assert_orthonormal(m: &DMat2) {
        assert_mat2_eq(&(*m * m.transpose()), &DMat2::IDENTITY, 1e-12);
        assert_relative_eq!(m.determinant().abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_svd2_diagonal() -> Result<(), LinalgError> {
        let a = DMat2::from_diagonal(DVec2::new(2.0, 5.0));
        let svd = svd2(&a)?;
        assert_relative_eq!(svd.s().x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(svd.s().y, 2.0, epsilon = 1e-12);
        assert_mat2_eq(&svd.reconstruct(), &a, 1e-12);
        Ok(())
    }

    #[test]
    fn test_svd2_zero() -> Result<(), LinalgError> {
        let svd = svd2(&DMat2::ZERO)?;
        assert_eq!(*svd.s(), DVec2::ZERO);
        assert_orthonormal(svd.u());
        assert_orthonormal(svd.v());
        Ok(())
    }

    #[test]
    fn test_svd2_reflection() -> Result<(), LinalgError> {
        // pure reflection across the x axis
        let a = DMat2::from_cols_array(&[1.0, 0.0, 0.0, -1.0]);
        let svd = svd2(&a)?;
        assert_relative_eq!(svd.s().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(svd.s().y, 1.0, epsilon = 1e-12);
        assert_mat2_eq(&svd.reconstruct(), &a, 1e-12);
        Ok(())
    }

    #[test]
    fn test_svd2_random() -> Result<(), LinalgError> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = DMat2::from_cols_array(&[
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            ]);
            let svd = svd2(&a)?;
            assert!(svd.s().x >= svd.s().y);
            assert!(svd.s().y >= 0.0);
            assert_orthonormal(svd.u());
            assert_orthonormal(svd.v());
            assert_mat2_eq(&svd.reconstruct(), &a, 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_svd2_non_finite() {
        let a = DMat2::from_cols_array(&[f64::NAN, 0.0, 0.0, 1.0]);
        assert_eq!(svd2(&a).unwrap_err(), LinalgError::NonFiniteInput);
    }
}
