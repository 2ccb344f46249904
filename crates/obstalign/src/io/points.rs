use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use glam::DVec2;

use super::IoError;

/// Read a JSON list of `[x, y]` pairs.
pub fn read_points(path: impl AsRef<Path>) -> Result<Vec<DVec2>, IoError> {
    let file = File::open(path)?;
    let raw: Vec<[f64; 2]> = serde_json::from_reader(BufReader::new(file))?;
    Ok(raw.into_iter().map(DVec2::from).collect())
}

/// Write points as a JSON list of `[x, y]` pairs.
pub fn write_points(path: impl AsRef<Path>, points: &[DVec2]) -> Result<(), IoError> {
    let raw = points.iter().map(|p| p.to_array()).collect::<Vec<_>>();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &raw)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("points.json");
        let points = vec![DVec2::new(1.0, -2.5), DVec2::new(1e6, 3.25)];
        write_points(&path, &points)?;
        assert_eq!(read_points(&path)?, points);

        std::fs::write(&path, "[[1.0]]")?;
        assert!(read_points(&path).is_err());
        Ok(())
    }
}
