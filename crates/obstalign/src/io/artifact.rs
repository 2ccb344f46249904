use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use obstalign_match::{Obstacle, SetSide};
use serde::{Deserialize, Serialize};

use super::IoError;
use crate::{fit::lookup, Calibration, FitConfidence};

/// A planar position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2 {
    /// X coordinate in meters.
    pub x: f64,
    /// Y coordinate in meters.
    pub y: f64,
}

/// Box dimensions snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionsRecord {
    /// Length in meters.
    pub length: f64,
    /// Width in meters.
    pub width: f64,
    /// Height in meters.
    pub height: f64,
}

impl From<&Obstacle> for DimensionsRecord {
    fn from(obs: &Obstacle) -> Self {
        Self {
            length: obs.length,
            width: obs.width,
            height: obs.height,
        }
    }
}

/// The fitted rigid transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationBlock {
    /// Translation applied after the rotation.
    pub translation: Position2,
    /// Rotation angle in radians.
    pub rotation_radians: f64,
    /// Rotation angle in degrees.
    pub rotation_degrees: f64,
    /// Row-major 2x2 rotation matrix.
    pub rotation_matrix: [[f64; 2]; 2],
    /// Whether the rotation is determined by the matches.
    #[serde(default)]
    pub confidence: FitConfidence,
}

/// Residual error statistics in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyBlock {
    /// Number of matched pairs.
    pub num_matches: usize,
    /// Mean residual.
    pub mean_error: f64,
    /// Median residual.
    pub median_error: f64,
    /// Largest residual.
    pub max_error: f64,
    /// Smallest residual.
    pub min_error: f64,
    /// Population standard deviation of the residuals.
    pub std_error: f64,
}

/// Statistics of the raw, unrotated per-pair offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleOffsetBlock {
    /// Mean x offset.
    pub dx_mean: f64,
    /// Standard deviation of the x offset.
    pub dx_std: f64,
    /// Mean y offset.
    pub dy_mean: f64,
    /// Standard deviation of the y offset.
    pub dy_std: f64,
}

/// Dimension snapshots of both members of a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDimensions {
    /// Source box dimensions.
    pub src: DimensionsRecord,
    /// Destination box dimensions.
    pub dst: DimensionsRecord,
}

/// One accepted correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Index into the source set.
    pub src_index: usize,
    /// Index into the destination set.
    pub dst_index: usize,
    /// Source identifier.
    pub src_id: String,
    /// Destination identifier.
    pub dst_id: String,
    /// Source position.
    pub src_pos: Position2,
    /// Destination position.
    pub dst_pos: Position2,
    /// Matching cost.
    pub matching_cost: f64,
    /// Residual after the fitted transform.
    pub transform_error: f64,
    /// Box dimensions of both obstacles.
    pub dimensions: PairDimensions,
}

/// Obstacles left without a partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedBlock {
    /// Unmatched source (scenario) obstacles.
    pub scenarios_count: usize,
    /// Unmatched destination (recorded) obstacles.
    pub data_count: usize,
}

/// The calibration result handed to downstream tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationArtifact {
    /// Fitted transform.
    pub transformation: TransformationBlock,
    /// Residual statistics.
    pub accuracy: AccuracyBlock,
    /// Raw offset statistics.
    pub simple_offset_stats: SimpleOffsetBlock,
    /// Accepted correspondences.
    pub matched_pairs: Vec<MatchedPair>,
    /// Coverage of the matching.
    pub unmatched: UnmatchedBlock,
}

impl CalibrationArtifact {
    /// Build the artifact of a calibration over the given obstacle sets.
    ///
    /// PRECONDITION: `src` and `dst` are the sets the calibration ran on.
    pub fn new(
        calibration: &Calibration,
        src: &[Obstacle],
        dst: &[Obstacle],
    ) -> Result<Self, IoError> {
        let transform = &calibration.transform;
        let accuracy = &calibration.accuracy;
        let r = transform.rotation;

        let matched_pairs = calibration
            .matches
            .iter()
            .zip(transform.residuals.iter())
            .map(|(m, &residual)| -> Result<MatchedPair, IoError> {
                let s = lookup(src, m.src_index, SetSide::Source)?;
                let d = lookup(dst, m.dst_index, SetSide::Destination)?;
                Ok(MatchedPair {
                    src_index: m.src_index,
                    dst_index: m.dst_index,
                    src_id: s.id.clone(),
                    dst_id: d.id.clone(),
                    src_pos: Position2 { x: s.x, y: s.y },
                    dst_pos: Position2 { x: d.x, y: d.y },
                    matching_cost: m.cost,
                    transform_error: residual,
                    dimensions: PairDimensions {
                        src: s.into(),
                        dst: d.into(),
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            transformation: TransformationBlock {
                translation: Position2 {
                    x: transform.translation.x,
                    y: transform.translation.y,
                },
                rotation_radians: transform.angle,
                rotation_degrees: transform.angle_degrees(),
                // glam stores columns; the artifact stores rows
                rotation_matrix: [[r.x_axis.x, r.y_axis.x], [r.x_axis.y, r.y_axis.y]],
                confidence: transform.confidence,
            },
            accuracy: AccuracyBlock {
                num_matches: accuracy.num_matches(),
                mean_error: accuracy.residuals.mean,
                median_error: accuracy.residuals.median,
                max_error: accuracy.residuals.max,
                min_error: accuracy.residuals.min,
                std_error: accuracy.residuals.std,
            },
            simple_offset_stats: SimpleOffsetBlock {
                dx_mean: transform.offset_mean.x,
                dx_std: transform.offset_std.x,
                dy_mean: transform.offset_mean.y,
                dy_std: transform.offset_std.y,
            },
            matched_pairs,
            unmatched: UnmatchedBlock {
                scenarios_count: accuracy.unmatched_src,
                data_count: accuracy.unmatched_dst,
            },
        })
    }
}

/// Write the artifact as pretty-printed JSON.
///
/// # Arguments
///
/// * `path` - The destination file. It is created or truncated.
/// * `artifact` - The artifact to write.
pub fn write_artifact(path: impl AsRef<Path>, artifact: &CalibrationArtifact) -> Result<(), IoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, artifact)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read an artifact written by [`write_artifact`].
pub fn read_artifact(path: impl AsRef<Path>) -> Result<CalibrationArtifact, IoError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
