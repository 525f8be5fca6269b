//! WebSocket message protocol for `/ws/pose`.
//!
//! Every message is a JSON text frame tagged by `"type"`.
//!
//! | client                      | server                          |
//! |-----------------------------|---------------------------------|
//! | `config`                    | `config_ack` or `error`         |
//! | `landmarks`                 | `result`, `skipped` or `error`  |
//! | `ping`                      | `pong`                          |

use posecoach_core::{Error, LandmarkFrame, Phase, Result};
use posecoach_exercise::{RepEvent, SessionUpdate};
use serde::{Deserialize, Serialize};

/// Messages sent by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start (or restart) the connection's session
    Config {
        #[serde(default)]
        exercise: Option<String>,
        #[serde(default)]
        log_enabled: Option<bool>,
    },
    /// One frame of pose landmarks
    Landmarks {
        landmarks: Vec<Vec<f64>>,
        #[serde(default)]
        layout: LandmarkLayout,
    },
    Ping,
}

/// Keypoint layout of an incoming frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandmarkLayout {
    /// 33 rows of `[x, y, z, visibility]`; `z` and visibility may be omitted
    #[default]
    Blazepose33,
    /// 17 rows of `[x, y, confidence]`; confidence may be omitted
    Coco17,
}

impl LandmarkLayout {
    pub fn to_frame(self, rows: &[Vec<f64>]) -> Result<LandmarkFrame> {
        match self {
            LandmarkLayout::Blazepose33 => {
                let tuples = rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| match row.as_slice() {
                        [x, y] => Ok([*x, *y, 0.0, 1.0]),
                        [x, y, z] => Ok([*x, *y, *z, 1.0]),
                        [x, y, z, vis] => Ok([*x, *y, *z, *vis]),
                        _ => Err(bad_row(i, row.len())),
                    })
                    .collect::<Result<Vec<_>>>()?;
                LandmarkFrame::from_tuples(&tuples)
            }
            LandmarkLayout::Coco17 => {
                let keypoints = rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| match row.as_slice() {
                        [x, y] => Ok([*x, *y, 1.0]),
                        [x, y, conf] => Ok([*x, *y, *conf]),
                        _ => Err(bad_row(i, row.len())),
                    })
                    .collect::<Result<Vec<_>>>()?;
                LandmarkFrame::from_coco17(&keypoints)
            }
        }
    }
}

fn bad_row(index: usize, len: usize) -> Error {
    Error::InvalidInput(format!("landmark row {index} has {len} values"))
}

/// Feedback as presented to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    pub name: String,
    pub reps: u32,
    pub phase: Phase,
    pub cues: Vec<String>,
    pub voice_cue: Option<String>,
}

impl From<&SessionUpdate> for FeedbackPayload {
    fn from(update: &SessionUpdate) -> Self {
        Self {
            name: update.feedback.name.clone(),
            reps: update.feedback.reps,
            phase: update.feedback.phase,
            cues: update.feedback.cues.clone(),
            voice_cue: update.voice_cue.clone(),
        }
    }
}

/// Messages sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConfigAck {
        exercise: String,
    },
    Result {
        feedback: FeedbackPayload,
        rep: Option<RepEvent>,
    },
    /// Frame dropped; the session is unchanged
    Skipped {
        reason: String,
    },
    Error {
        message: String,
    },
    Pong,
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
