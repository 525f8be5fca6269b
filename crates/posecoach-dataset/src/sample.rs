//! Labelled landmark samples.

use posecoach_core::{BodyLandmark, Error, LandmarkFrame, Point, Result};
use serde::{Deserialize, Serialize};

/// Fields stored per landmark, in column order.
pub const LANDMARK_FIELDS: [&str; 4] = ["x", "y", "z", "vis"];

/// One labelled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Exercise id, also the file stem
    pub exercise: String,
    /// Usually the phase at capture time
    pub label: String,
    pub landmarks: Vec<Point>,
}

impl Sample {
    pub fn new(exercise: impl Into<String>, label: impl Into<String>, frame: &LandmarkFrame) -> Self {
        Self {
            exercise: exercise.into(),
            label: label.into(),
            landmarks: frame.points().to_vec(),
        }
    }

    /// Column names for `landmark_count` landmarks.
    pub fn header(landmark_count: usize) -> Vec<String> {
        let mut header = vec!["exercise".to_string(), "label".to_string()];
        for i in 0..landmark_count {
            for field in LANDMARK_FIELDS {
                header.push(format!("lm{i}_{field}"));
            }
        }
        header
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(2 + self.landmarks.len() * LANDMARK_FIELDS.len());
        record.push(self.exercise.clone());
        record.push(self.label.clone());
        for point in &self.landmarks {
            record.extend(point.to_array().iter().map(|v| v.to_string()));
        }
        record
    }

    pub fn from_record(record: &csv::StringRecord) -> Result<Self> {
        let fields: Vec<&str> = record.iter().collect();
        if fields.len() < 2 || (fields.len() - 2) % LANDMARK_FIELDS.len() != 0 {
            return Err(Error::Dataset(format!(
                "malformed sample row with {} columns",
                fields.len()
            )));
        }

        let values = fields[2..]
            .iter()
            .map(|raw| {
                raw.parse::<f64>()
                    .map_err(|e| Error::Dataset(format!("bad value {raw:?}: {e}")))
            })
            .collect::<Result<Vec<f64>>>()?;

        let landmarks = values
            .chunks_exact(LANDMARK_FIELDS.len())
            .map(|c| Point::from_array([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self {
            exercise: fields[0].to_string(),
            label: fields[1].to_string(),
            landmarks,
        })
    }

    /// Rebuild the landmark frame this sample was taken from.
    pub fn to_frame(&self) -> Result<LandmarkFrame> {
        LandmarkFrame::from_points(&self.landmarks)
    }
}

/// Header for a full 33-slot frame.
pub fn frame_header() -> Vec<String> {
    Sample::header(BodyLandmark::COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = frame_header();
        assert_eq!(header.len(), 2 + 33 * 4);
        assert_eq!(&header[..6], &["exercise", "label", "lm0_x", "lm0_y", "lm0_z", "lm0_vis"]);
        assert_eq!(header.last().map(String::as_str), Some("lm32_vis"));
    }

    #[test]
    fn test_record_matches_header() {
        let frame = LandmarkFrame::empty()
            .with(BodyLandmark::Nose, Point::with_visibility(1.5, 2.5, 0.0, 0.75));
        let sample = Sample::new("squat", "down", &frame);
        let record = sample.to_record();
        assert_eq!(record.len(), frame_header().len());
        assert_eq!(&record[..6], &["squat", "down", "1.5", "2.5", "0", "0.75"]);
    }

    #[test]
    fn test_malformed_record() {
        let record = csv::StringRecord::from(vec!["squat", "down", "1.0", "2.0"]);
        assert!(matches!(Sample::from_record(&record), Err(Error::Dataset(_))));

        let record = csv::StringRecord::from(vec!["squat", "down", "1.0", "x", "0", "1"]);
        assert!(Sample::from_record(&record).is_err());
    }

    #[test]
    fn test_record_roundtrip_to_frame() {
        let frame = LandmarkFrame::empty()
            .with(BodyLandmark::LeftKnee, Point::with_visibility(10.0, 20.0, 0.0, 0.9));
        let sample = Sample::new("lunge", "up", &frame);
        let record = csv::StringRecord::from(sample.to_record());
        let parsed = Sample::from_record(&record).unwrap();
        assert_eq!(parsed.to_frame().unwrap(), frame);
    }
}
