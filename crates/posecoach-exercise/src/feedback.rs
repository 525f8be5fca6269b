//! Per-frame detector output.

use posecoach_core::Phase;
use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseKind;

/// Structured feedback, recomputed every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseFeedback {
    /// Exercise id, e.g. "side_lunge"
    pub name: String,
    pub reps: u32,
    pub phase: Phase,
    /// Advisory cues first, then the rep announcement if one fired
    pub cues: Vec<String>,
}

impl ExerciseFeedback {
    /// One-line summary as drawn on overlays.
    pub fn summary(&self) -> String {
        format!("{} | reps: {} | phase: {}", self.name, self.reps, self.phase)
    }
}

/// Emitted only on the frame a rep completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepEvent {
    pub exercise: ExerciseKind,
    pub count: u32,
}

/// Measured signal a detector classified this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSignal {
    /// Primary joint angle in degrees; 0.0 when indeterminate
    pub angle: f64,
    /// Squat depth ratio, absent for other exercises
    pub depth_ratio: Option<f64>,
}

/// Full result of one `infer` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    pub feedback: ExerciseFeedback,
    pub rep: Option<RepEvent>,
    pub signal: JointSignal,
}
