use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use obstalign_match::Obstacle;
use serde::Deserialize;

use super::{IoError, RawId};

#[derive(Debug, Deserialize)]
struct RecordingFile {
    #[serde(default)]
    object: Vec<RecordedObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordedObject {
    id: RawId,
    position_x: f64,
    position_y: f64,
    heading: f64,
    length: f64,
    width: f64,
    height: f64,
}

impl From<RecordedObject> for Obstacle {
    fn from(obj: RecordedObject) -> Self {
        Obstacle::new(
            obj.id,
            obj.position_x,
            obj.position_y,
            obj.heading,
            obj.length,
            obj.width,
            obj.height,
        )
    }
}

/// Parse recorded obstacles from a reader.
///
/// The document holds an `object` array whose records carry `id`,
/// `positionX`, `positionY`, `heading`, `length`, `width` and `height`.
/// A missing array yields an empty set; a record missing any field is an
/// error.
pub fn recording_obstacles_from_reader(reader: impl Read) -> Result<Vec<Obstacle>, IoError> {
    let file: RecordingFile = serde_json::from_reader(reader)?;
    Ok(file.object.into_iter().map(Obstacle::from).collect())
}

/// Parse recorded obstacles from a JSON string.
pub fn recording_obstacles_from_str(data: &str) -> Result<Vec<Obstacle>, IoError> {
    recording_obstacles_from_reader(data.as_bytes())
}

/// Read the recorded obstacles from a file.
///
/// # Arguments
///
/// * `path` - The path to the recording JSON file.
///
/// # Returns
///
/// The obstacles in file order.
pub fn read_recording_obstacles(path: impl AsRef<Path>) -> Result<Vec<Obstacle>, IoError> {
    let file = File::open(path)?;
    let obstacles = recording_obstacles_from_reader(BufReader::new(file))?;
    log::debug!("Read {} recorded obstacles", obstacles.len());
    Ok(obstacles)
}
