use serde::Deserialize;

/// Calibration result artifact.
pub mod artifact;

/// Planar point lists for the offset applier.
pub mod points;

/// Recorded obstacle files.
pub mod recording;

/// Scenario description files.
pub mod scenario;

pub use artifact::{read_artifact, write_artifact, CalibrationArtifact};
pub use recording::read_recording_obstacles;
pub use scenario::read_scenario_obstacles;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// The file is not valid JSON or lacks required fields.
    #[error("Failed to parse JSON. {0}")]
    JsonError(#[from] serde_json::Error),

    /// The artifact could not be built from the calibration.
    #[error("Failed to build the artifact. {0}")]
    ArtifactError(#[from] crate::FitError),
}

// Identifiers arrive as JSON strings or numbers; both are kept as opaque text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}
