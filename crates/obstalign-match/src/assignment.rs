//! Optimal linear assignment on rectangular cost matrices.
//!
//! Solves
//!
//! ```text
//! min Σ C[i, σ(i)]   over injective σ
//! ```
//!
//! with the shortest augmenting path form of the Hungarian method (dual
//! potentials `u`, `v` and one Dijkstra-like sweep per row), in
//! `O(n² m)` time for an `n × m` matrix with `n ≤ m`. A matrix with more
//! rows than columns is solved through its transpose, so exactly
//! `min(n, m)` pairs are assigned. No dummy rows or columns are added.
//!
//! Every row (or column, for tall matrices) gets a partner, including pairs
//! whose cost is a gating sentinel. Callers filter those afterwards.

use crate::cost::CostMatrix;
use crate::MatchError;

/// Solve the linear assignment problem for a rectangular cost matrix.
///
/// # Arguments
///
/// * `cost` - The cost matrix. All entries must be finite.
///
/// # Returns
///
/// The assigned `(row, col)` pairs sorted by row. There are `min(rows, cols)` of them.
///
/// Example:
///
/// ```
/// use obstalign_match::assignment::linear_sum_assignment;
/// use obstalign_match::cost::CostMatrix;
///
/// let cost = CostMatrix::from_row_major(2, 2, vec![4.0, 1.0, 2.0, 8.0]);
/// let pairs = linear_sum_assignment(&cost).unwrap();
/// assert_eq!(pairs, vec![(0, 1), (1, 0)]);
/// ```
pub fn linear_sum_assignment(cost: &CostMatrix) -> Result<Vec<(usize, usize)>, MatchError> {
    cost.check_finite()?;

    if cost.rows() == 0 || cost.cols() == 0 {
        return Ok(Vec::new());
    }

    if cost.rows() <= cost.cols() {
        return Ok(solve_wide(cost));
    }

    let mut pairs = solve_wide(&cost.transpose())
        .into_iter()
        .map(|(col, row)| (row, col))
        .collect::<Vec<_>>();
    pairs.sort_unstable();
    Ok(pairs)
}

/// Total cost of a set of assigned pairs.
pub fn assignment_cost(cost: &CostMatrix, pairs: &[(usize, usize)]) -> f64 {
    pairs.iter().map(|&(i, j)| cost[(i, j)]).sum()
}

// Hungarian method with potentials for rows <= cols.
// Index 0 is a virtual column used as the root of each augmenting search,
// so rows and columns are 1-based inside this function.
fn solve_wide(cost: &CostMatrix) -> Vec<(usize, usize)> {
    let n = cost.rows();
    let m = cost.cols();
    debug_assert!(n <= m);

    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    // p[j]: row assigned to column j (0 = free)
    let mut p = vec![0usize; m + 1];
    // way[j]: previous column on the shortest path to j
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let row = cost.row(i0 - 1);
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = row[j - 1] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // augment along the path back to the virtual column
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut pairs = (1..=m)
        .filter(|&j| p[j] != 0)
        .map(|j| (p[j] - 1, j - 1))
        .collect::<Vec<_>>();
    pairs.sort_unstable();
    pairs
}
