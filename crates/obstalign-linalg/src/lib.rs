#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::LinalgError;

/// Rigid alignment of planar point sets (2D Kabsch).
pub mod rigid;

/// Descriptive statistics over residuals and offsets.
pub mod stats;

/// Closed-form SVD of a 2x2 matrix.
pub mod svd;
