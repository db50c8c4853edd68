//! File-backed landmark source for replaying recorded tracking sessions.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;

use crate::constants::NUM_TRACKED_POINTS;
use crate::landmarks::{IndexedLandmarks, LandmarkSample, LandmarkSource};
use crate::{Error, Result};

/// Replays landmark frames from a text file, one frame per line.
///
/// Each frame line holds 15 whitespace-separated floats: the top, bottom,
/// left, right and center points as `x y z` triples. A line containing
/// only `-` is a tick with no detected face. Blank lines and lines
/// starting with `#` are skipped.
pub struct ReplaySource {
    frames: std::vec::IntoIter<Option<IndexedLandmarks>>,
}

impl ReplaySource {
    /// Load a recorded session
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a frame line is
    /// malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut frames = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line == "-" {
                frames.push(None);
                continue;
            }
            frames.push(Some(Self::parse_frame(line, index + 1)?));
        }
        Ok(Self::from_frames(frames))
    }

    /// Build a source from in-memory frames
    #[must_use]
    pub fn from_frames(frames: Vec<Option<IndexedLandmarks>>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }

    fn parse_frame(line: &str, line_number: usize) -> Result<IndexedLandmarks> {
        let values: Vec<f64> = line
            .split_whitespace()
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::InvalidInput(format!("replay line {line_number}: {e}")))?;

        let expected = NUM_TRACKED_POINTS * 3;
        if values.len() != expected {
            return Err(Error::InvalidInput(format!(
                "replay line {line_number}: expected {expected} values, got {}",
                values.len()
            )));
        }

        let point = |i: usize| Point3::new(values[i * 3], values[i * 3 + 1], values[i * 3 + 2]);
        let sample = LandmarkSample {
            top: point(0),
            bottom: point(1),
            left: point(2),
            right: point(3),
            center: point(4),
        };
        Ok(sample.to_indexed())
    }
}

impl LandmarkSource for ReplaySource {
    fn capture(&mut self) -> Result<Option<IndexedLandmarks>> {
        self.frames.next().ok_or(Error::SourceExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SESSION: &str = "\
# neutral frame, then a dropout, then a shifted frame
0.5 0.1 0.0  0.5 0.9 0.0  0.2 0.5 0.0  0.8 0.5 0.0  0.5 0.5 0.0
-
0.5 0.1 0.0  0.5 0.9 0.0  0.3 0.5 0.0  0.9 0.5 0.0  0.6 0.5 0.0
";

    #[test]
    fn test_replays_frames_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();

        let mut source = ReplaySource::from_file(file.path()).unwrap();

        let first = source.capture().unwrap().expect("first frame has a face");
        let sample = LandmarkSample::from_indexed(&first).unwrap();
        assert_eq!(sample.left, Point3::new(0.2, 0.5, 0.0));

        assert!(source.capture().unwrap().is_none(), "dropout tick");

        let third = source.capture().unwrap().expect("third frame has a face");
        let sample = LandmarkSample::from_indexed(&third).unwrap();
        assert_eq!(sample.left, Point3::new(0.3, 0.5, 0.0));

        assert!(matches!(source.capture(), Err(Error::SourceExhausted)));
    }

    #[test]
    fn test_rejects_malformed_frame() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0.5 0.1 0.0\n").unwrap();
        assert!(matches!(
            ReplaySource::from_file(file.path()),
            Err(Error::InvalidInput(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a b c d e f g h i j k l m n o\n").unwrap();
        assert!(ReplaySource::from_file(file.path()).is_err());
    }
}
