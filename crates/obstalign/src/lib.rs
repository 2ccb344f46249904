#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The calibration runs in four strictly ordered steps:
//!
//! 1. [`matching::estimate_initial_offset`] seeds a coarse translation from the
//!    centroids of the two sets.
//! 2. [`matching::match_obstacles`] solves a gated optimal assignment between
//!    the sets.
//! 3. [`fit_transform`] fits a proper rigid transform to the matched centers.
//! 4. [`AccuracyReport`] summarizes the residuals and the match coverage.
//!
//! [`calibrate`] runs all of them. [`io`] reads the input obstacle files and
//! writes the result artifact.

#[doc(inline)]
pub use obstalign_linalg as linalg;

#[doc(inline)]
pub use obstalign_match as matching;

pub use obstalign_match::{Match, MatchingParams, Obstacle};

mod accuracy;
pub use accuracy::AccuracyReport;

/// Offset transform applied to downstream geometry.
pub mod apply;

mod calibrate;
pub use calibrate::{calibrate, Calibration, CalibrationError, CalibrationParams};

mod fit;
pub use fit::{fit_transform, FitConfidence, FitError, TransformResult};

/// Reading obstacle sets and reading/writing the calibration artifact.
pub mod io;
