//! Error types for the Pose Coach system.

use thiserror::Error;

use crate::types::BodyLandmark;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid landmark frame: expected at least {expected} slots, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("Unknown exercise: {0:?}")]
    UnknownExercise(String),

    #[error("Landmark {landmark} occluded: visibility {visibility:.2} below {min_visibility:.2}")]
    OccludedLandmark {
        landmark: BodyLandmark,
        visibility: f64,
        min_visibility: f64,
    },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Voice error: {0}")]
    Voice(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Per-frame errors are local: the session skips the frame and keeps going.
    pub fn is_frame_error(&self) -> bool {
        matches!(self, Error::InvalidFrame { .. } | Error::OccludedLandmark { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
