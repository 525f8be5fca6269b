//! Per-client feedback aggregation.
//!
//! A session owns exactly one detector and decides which of its output is
//! worth surfacing to the voice and dataset collaborators.

use posecoach_core::{LandmarkFrame, Phase, Result};
use serde::{Deserialize, Serialize};

use crate::detector::ExerciseDetector;
use crate::exercise::ExerciseKind;
use crate::feedback::{ExerciseFeedback, JointSignal, RepEvent};
use crate::gate::VisibilityGate;

/// Session-level knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Visibility cutoff for required joints; `None` disables gating
    pub min_visibility: Option<f64>,
    /// Whether processed frames should be offered to the dataset logger
    pub log_samples: bool,
    /// Offer every Nth successfully processed frame; 0 disables sampling
    pub sample_every: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            min_visibility: None,
            log_samples: false,
            sample_every: 5,
        }
    }
}

/// What one frame produced for the boundary collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub feedback: ExerciseFeedback,
    pub rep: Option<RepEvent>,
    pub signal: JointSignal,
    /// Text to announce this frame, if any
    pub voice_cue: Option<String>,
    /// Whether this frame should be written to the dataset
    pub log_sample: bool,
}

pub struct FeedbackSession {
    detector: ExerciseDetector,
    options: SessionOptions,
    last_phase: Option<Phase>,
    frames_processed: u64,
    frames_skipped: u64,
}

impl FeedbackSession {
    /// Start a session for the named exercise. Unknown names fail here, never
    /// on the first frame.
    pub fn new(exercise: &str, options: SessionOptions) -> Result<Self> {
        let kind = ExerciseKind::from_name(exercise)?;
        Ok(Self::for_kind(kind, options))
    }

    pub fn for_kind(kind: ExerciseKind, options: SessionOptions) -> Self {
        tracing::info!(exercise = %kind, ?options, "feedback session started");
        Self {
            detector: ExerciseDetector::with_gate(
                kind,
                VisibilityGate::from_option(options.min_visibility),
            ),
            options,
            last_phase: None,
            frames_processed: 0,
            frames_skipped: 0,
        }
    }

    /// Process one frame in arrival order.
    ///
    /// A rejected frame leaves the detector, the phase history and the sample
    /// cadence exactly as they were.
    ///
    /// At most one voice cue is produced per frame, as the streaming backend
    /// does: on a rep frame the rep cue replaces the phase announcement rather
    /// than being spoken in addition to it.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Result<SessionUpdate> {
        let inference = match self.detector.infer(frame) {
            Ok(inference) => inference,
            Err(e) => {
                self.frames_skipped += 1;
                tracing::warn!(exercise = %self.exercise(), "skipping frame: {}", e);
                return Err(e);
            }
        };
        self.frames_processed += 1;

        let feedback = inference.feedback;
        let mut voice_cue = None;

        if self.last_phase != Some(feedback.phase) {
            tracing::debug!(
                exercise = %self.exercise(),
                from = ?self.last_phase,
                to = %feedback.phase,
                "phase changed"
            );
            self.last_phase = Some(feedback.phase);
            voice_cue = Some(format!("{} {}", feedback.name, feedback.phase));
        }

        // a rep announcement wins over the phase announcement
        if let Some(cue) = feedback.cues.iter().rev().find(|cue| cue.contains("rep")) {
            voice_cue = Some(cue.clone());
        }

        let log_sample = self.options.log_samples
            && self.options.sample_every > 0
            && self.frames_processed % u64::from(self.options.sample_every) == 0;

        Ok(SessionUpdate {
            feedback,
            rep: inference.rep,
            signal: inference.signal,
            voice_cue,
            log_sample,
        })
    }

    /// Switch exercise. Builds a fresh detector, so reps restart at zero.
    ///
    /// An unknown name leaves the current session untouched.
    pub fn change_exercise(&mut self, exercise: &str) -> Result<()> {
        let kind = ExerciseKind::from_name(exercise)?;
        *self = Self::for_kind(kind, self.options);
        Ok(())
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.detector.kind()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn reps(&self) -> u32 {
        self.detector.reps()
    }

    pub fn last_phase(&self) -> Option<Phase> {
        self.last_phase
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}
