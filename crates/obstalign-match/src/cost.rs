use std::ops::Index;

use glam::DVec2;

use crate::{MatchError, Obstacle};

/// Cost assigned to a pair whose positions are farther apart than the gate.
pub const UNREACHABLE_COST: f64 = 1e10;

/// Assigned pairs at or above this cost are treated as unmatched.
pub const VALID_COST_LIMIT: f64 = 1e9;

/// Dense row-major cost matrix with one row per source obstacle and one
/// column per destination obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Create a matrix from row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "cost matrix data has wrong length");
        Self { rows, cols, data }
    }

    /// Create a matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// A row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self.get(j, i))
    }

    /// Return the first non-finite entry, if any.
    pub fn check_finite(&self) -> Result<(), MatchError> {
        match self.data.iter().position(|c| !c.is_finite()) {
            Some(idx) => Err(MatchError::NonFiniteCost {
                row: idx / self.cols,
                col: idx % self.cols,
            }),
            None => Ok(()),
        }
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

/// Cost of pairing `src` with `dst` after shifting `src` by `offset`.
///
/// The cost is `pos_dist + dimension_weight * dim_diff`, where `pos_dist` is
/// the Euclidean distance between the shifted source center and the
/// destination center, and `dim_diff` is the L1 distance of the box
/// dimensions. Pairs with `pos_dist > max_distance` get [`UNREACHABLE_COST`]
/// no matter how well their dimensions agree. Heading is not used.
pub fn pair_cost(
    src: &Obstacle,
    dst: &Obstacle,
    offset: DVec2,
    max_distance: f64,
    dimension_weight: f64,
) -> f64 {
    let pos_dist = (src.position() + offset).distance(dst.position());
    if pos_dist > max_distance {
        return UNREACHABLE_COST;
    }
    pos_dist + dimension_weight * src.dimension_diff(dst)
}

/// Build the cost matrix between every source and destination obstacle.
///
/// # Arguments
///
/// * `src` - Source obstacles, one per row.
/// * `dst` - Destination obstacles, one per column.
/// * `offset` - Translation applied to the source positions only.
/// * `max_distance` - Position gate in meters.
/// * `dimension_weight` - Weight of the dimension mismatch term.
pub fn build_cost_matrix(
    src: &[Obstacle],
    dst: &[Obstacle],
    offset: DVec2,
    max_distance: f64,
    dimension_weight: f64,
) -> CostMatrix {
    CostMatrix::from_fn(src.len(), dst.len(), |i, j| {
        pair_cost(&src[i], &dst[j], offset, max_distance, dimension_weight)
    })
}
