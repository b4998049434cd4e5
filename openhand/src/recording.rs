//! Motion-capture recording ingestion.
//!
//! Recordings are headerless CSV, eight numeric columns per row: columns 0-3
//! are finger 1 `(px, pz, dx, dz)`, columns 4-7 finger 2. Rows are read once
//! into immutable samples; malformed rows and unreadable files fail fast.

use std::path::Path;

use serde::Deserialize;

use crate::{HandError, JointSample};

#[derive(Debug, Deserialize)]
struct MarkerRow {
    f1_px: f64,
    f1_pz: f64,
    f1_dx: f64,
    f1_dz: f64,
    f2_px: f64,
    f2_pz: f64,
    f2_dx: f64,
    f2_dz: f64,
}

/// A loaded capture: one ordered sample sequence per finger, equal lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub finger1: Vec<JointSample>,
    pub finger2: Vec<JointSample>,
}

impl Recording {
    /// Reads a recording from a CSV file. Fails with a descriptive
    /// [`HandError::Recording`] on a missing file or malformed row.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Recording, HandError> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| HandError::Recording(format!("{}: {}", path.display(), e)))?;

        let mut finger1 = Vec::new();
        let mut finger2 = Vec::new();
        for (row_index, result) in reader.deserialize::<MarkerRow>().enumerate() {
            let row = result.map_err(|e| {
                HandError::Recording(format!("{} row {}: {}", path.display(), row_index, e))
            })?;
            finger1.push(JointSample::new(row.f1_px, row.f1_pz, row.f1_dx, row.f1_dz));
            finger2.push(JointSample::new(row.f2_px, row.f2_pz, row.f2_dx, row.f2_dz));
        }

        Ok(Recording { finger1, finger2 })
    }

    pub fn len(&self) -> usize {
        self.finger1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finger1.is_empty()
    }

    /// Marker trajectory of one joint as `(x, z)` pairs, for plotting.
    pub fn trajectory(samples: &[JointSample], joint: Joint) -> Vec<(f64, f64)> {
        samples
            .iter()
            .map(|s| match joint {
                Joint::Proximal => (s.proximal.x, s.proximal.y),
                Joint::Distal => (s.distal.x, s.distal.y),
            })
            .collect()
    }
}

/// Which of the two tracked markers of a finger a trajectory follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Proximal,
    Distal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("openhand-{}-{}.csv", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_headerless_eight_column_rows() {
        let path = write_temp_csv(
            "load",
            "0.03,0.07,0.04,0.09,0.06,0.07,0.05,0.09\n\
             0.031,0.071,0.041,0.091,0.061,0.071,0.051,0.091\n",
        );
        let recording = Recording::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(recording.len(), 2);
        assert_eq!(recording.finger1[0], JointSample::new(0.03, 0.07, 0.04, 0.09));
        assert_eq!(recording.finger2[0], JointSample::new(0.06, 0.07, 0.05, 0.09));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = Recording::load("/nonexistent/grasp.csv").unwrap_err();
        match err {
            HandError::Recording(msg) => assert!(msg.contains("/nonexistent/grasp.csv")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn malformed_row_reports_its_index() {
        let path = write_temp_csv("malformed", "0.03,0.07,0.04,0.09,0.06,0.07,0.05,0.09\n1,2,three\n");
        let err = Recording::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        match err {
            HandError::Recording(msg) => assert!(msg.contains("row 1")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
