use glam::DVec2;

use crate::assignment::linear_sum_assignment;
use crate::cost::{build_cost_matrix, VALID_COST_LIMIT};
use crate::obstacle::check_obstacles;
use crate::{estimate_initial_offset, MatchError, Obstacle, SetSide};

/// A hypothesized correspondence between a source and a destination obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Index into the source set.
    pub src_index: usize,
    /// Index into the destination set.
    pub dst_index: usize,
    /// Matching cost of the pair.
    pub cost: f64,
}

/// Parameters of the correspondence solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingParams {
    /// Translation applied to source positions when computing costs. When
    /// `None`, the centroid difference of the two sets is used.
    pub initial_offset: Option<DVec2>,
    /// Pairs farther apart than this (meters, after the offset) are forbidden.
    pub max_distance: f64,
    /// Weight of the L1 dimension mismatch in the cost.
    pub dimension_weight: f64,
}

impl Default for MatchingParams {
    fn default() -> Self {
        Self {
            initial_offset: None,
            max_distance: 50.0,
            dimension_weight: 100.0,
        }
    }
}

impl MatchingParams {
    fn validate(&self) -> Result<(), MatchError> {
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(MatchError::InvalidParameter {
                name: "max_distance",
                value: self.max_distance,
            });
        }
        if !self.dimension_weight.is_finite() || self.dimension_weight < 0.0 {
            return Err(MatchError::InvalidParameter {
                name: "dimension_weight",
                value: self.dimension_weight,
            });
        }
        if let Some(offset) = self.initial_offset {
            if !offset.is_finite() {
                let value = if offset.x.is_finite() { offset.y } else { offset.x };
                return Err(MatchError::InvalidParameter {
                    name: "initial_offset",
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Find the globally optimal one-to-one correspondence between two obstacle sets.
///
/// The cost of each pair combines the distance between the offset source
/// position and the destination position with a weighted dimension mismatch
/// (see [`crate::cost::pair_cost`]). The assignment minimizes the total cost
/// over all injective pairings. Pairs that the assignment had to take at the
/// forbidden sentinel cost are dropped rather than reported as matches.
///
/// # Arguments
///
/// * `src` - Source obstacles.
/// * `dst` - Destination obstacles.
/// * `params` - Gate, weights and optional initial offset.
///
/// # Returns
///
/// The retained matches ordered by source index. It is an error when none
/// survive the gate.
pub fn match_obstacles(
    src: &[Obstacle],
    dst: &[Obstacle],
    params: &MatchingParams,
) -> Result<Vec<Match>, MatchError> {
    check_obstacles(src, SetSide::Source)?;
    check_obstacles(dst, SetSide::Destination)?;
    params.validate()?;

    let offset = match params.initial_offset {
        Some(offset) => offset,
        None => estimate_initial_offset(src, dst)?,
    };
    log::debug!("Initial offset: dx={:.2}, dy={:.2}", offset.x, offset.y);

    let cost = build_cost_matrix(src, dst, offset, params.max_distance, params.dimension_weight);
    log::debug!("Solving assignment on a {}x{} cost matrix", cost.rows(), cost.cols());

    let pairs = linear_sum_assignment(&cost)?;
    let num_assigned = pairs.len();

    let matches = pairs
        .into_iter()
        .map(|(i, j)| Match {
            src_index: i,
            dst_index: j,
            cost: cost[(i, j)],
        })
        .filter(|m| m.cost < VALID_COST_LIMIT)
        .collect::<Vec<_>>();

    if matches.len() < num_assigned {
        log::warn!(
            "Dropped {} assigned pairs beyond the {} m gate",
            num_assigned - matches.len(),
            params.max_distance
        );
    }

    if matches.is_empty() {
        return Err(MatchError::NoValidMatches {
            num_src: src.len(),
            num_dst: dst.len(),
            max_distance: params.max_distance,
        });
    }

    log::info!("Found {} valid matches", matches.len());

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn car(id: &str, x: f64, y: f64) -> Obstacle {
        Obstacle::new(id, x, y, 0.0, 4.0, 2.0, 1.0)
    }

    #[test]
    fn test_basic_match() -> Result<(), MatchError> {
        let src = vec![car("a", 0.0, 0.0)];
        let dst = vec![car("b", 10.0, 10.0)];
        let offset = estimate_initial_offset(&src, &dst)?;
        assert_relative_eq!(offset.x, 10.0);
        assert_relative_eq!(offset.y, 10.0);

        let params = MatchingParams {
            initial_offset: Some(offset),
            max_distance: 0.0,
            ..Default::default()
        };
        let matches = match_obstacles(&src, &dst, &params)?;
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].src_index, matches[0].dst_index), (0, 0));
        assert_relative_eq!(matches[0].cost, 0.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_forbidden_pair() {
        let src = vec![car("a", 0.0, 0.0)];
        let dst = vec![car("b", 1000.0, 1000.0)];
        let params = MatchingParams {
            initial_offset: Some(DVec2::ZERO),
            max_distance: 50.0,
            ..Default::default()
        };
        assert_eq!(
            match_obstacles(&src, &dst, &params),
            Err(MatchError::NoValidMatches {
                num_src: 1,
                num_dst: 1,
                max_distance: 50.0,
            })
        );
    }

    #[test]
    fn test_gate_beats_dimension_similarity() -> Result<(), MatchError> {
        // b is a perfect dimension match but out of range; c is in range
        let src = vec![car("a", 0.0, 0.0)];
        let dst = vec![
            car("b", 80.0, 0.0),
            Obstacle::new("c", 10.0, 0.0, 0.0, 4.5, 2.0, 1.0),
        ];
        let params = MatchingParams {
            initial_offset: Some(DVec2::ZERO),
            ..Default::default()
        };
        let matches = match_obstacles(&src, &dst, &params)?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].dst_index, 1);
        assert_relative_eq!(matches[0].cost, 10.0 + 100.0 * 0.5, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_identifiers_are_ignored() -> Result<(), MatchError> {
        // identifiers agree crosswise but geometry says otherwise
        let src = vec![car("1", 0.0, 0.0), car("2", 20.0, 0.0)];
        let dst = vec![car("2", 0.5, 0.0), car("1", 20.5, 0.0)];
        let params = MatchingParams {
            initial_offset: Some(DVec2::ZERO),
            ..Default::default()
        };
        let matches = match_obstacles(&src, &dst, &params)?;
        let pairs = matches
            .iter()
            .map(|m| (m.src_index, m.dst_index))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
        Ok(())
    }

    #[test]
    fn test_partial_gate_keeps_valid_pairs() -> Result<(), MatchError> {
        let src = vec![car("a", 0.0, 0.0), car("b", 200.0, 0.0)];
        let dst = vec![car("x", 1.0, 0.0), car("y", -300.0, 0.0)];
        let params = MatchingParams {
            initial_offset: Some(DVec2::ZERO),
            ..Default::default()
        };
        let matches = match_obstacles(&src, &dst, &params)?;
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].src_index, matches[0].dst_index), (0, 0));
        Ok(())
    }

    #[test]
    fn test_invalid_inputs() {
        let set = vec![car("a", 0.0, 0.0)];
        assert_eq!(
            match_obstacles(&[], &set, &MatchingParams::default()),
            Err(MatchError::EmptySet(SetSide::Source))
        );

        let bad = vec![car("a", 0.0, 0.0), car("b", f64::NAN, 0.0)];
        assert_eq!(
            match_obstacles(&set, &bad, &MatchingParams::default()),
            Err(MatchError::NonFiniteValue {
                side: SetSide::Destination,
                index: 1
            })
        );

        let params = MatchingParams {
            max_distance: -1.0,
            ..Default::default()
        };
        assert_eq!(
            match_obstacles(&set, &set, &params),
            Err(MatchError::InvalidParameter {
                name: "max_distance",
                value: -1.0
            })
        );
    }
}
