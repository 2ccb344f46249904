#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Rectangular linear assignment solver.
pub mod assignment;

/// Pairwise cost matrix between two obstacle sets.
pub mod cost;

mod correspondence;
pub use correspondence::{match_obstacles, Match, MatchingParams};

mod error;
pub use error::{MatchError, SetSide};

/// Oriented bounding box records.
pub mod obstacle;
pub use obstacle::Obstacle;

mod offset;
pub use offset::estimate_initial_offset;
