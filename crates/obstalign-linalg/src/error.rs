/// Error type for the planar linear algebra routines.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LinalgError {
    /// Source and destination arrays must have the same length.
    #[error("Mismatched input lengths: source ({src}) != destination ({dst})")]
    MismatchedInputLengths {
        /// Number of source points.
        src: usize,
        /// Number of destination points.
        dst: usize,
    },

    /// The routine needs at least one sample.
    #[error("Input must contain at least one element")]
    EmptyInput,

    /// The input contains NaN or infinite values.
    #[error("Input contains non-finite values")]
    NonFiniteInput,
}
