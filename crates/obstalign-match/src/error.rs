use std::fmt;

/// Which of the two obstacle sets an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetSide {
    /// The source (scenario) set.
    Source,
    /// The destination (recorded) set.
    Destination,
}

impl fmt::Display for SetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetSide::Source => write!(f, "source"),
            SetSide::Destination => write!(f, "destination"),
        }
    }
}

/// Error types for the correspondence step.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MatchError {
    /// One of the obstacle sets is empty.
    #[error("The {0} obstacle set is empty")]
    EmptySet(SetSide),

    /// An obstacle carries a NaN or infinite field.
    #[error("Obstacle {index} of the {side} set has a non-finite field")]
    NonFiniteValue {
        /// Set holding the bad record.
        side: SetSide,
        /// Position of the bad record in its set.
        index: usize,
    },

    /// A matching parameter is out of its valid range.
    #[error("Invalid matching parameter `{name}`: {value}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The cost matrix contains a NaN or infinite entry.
    #[error("Cost matrix entry ({row}, {col}) is not finite")]
    NonFiniteCost {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
    },

    /// No pair survived the distance gate after assignment.
    #[error(
        "No valid matches between {num_src} source and {num_dst} destination obstacles within {max_distance} m"
    )]
    NoValidMatches {
        /// Size of the source set.
        num_src: usize,
        /// Size of the destination set.
        num_dst: usize,
        /// Distance gate in meters.
        max_distance: f64,
    },
}
