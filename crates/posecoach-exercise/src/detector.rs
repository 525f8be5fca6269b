//! Exercise detector driving one rep counter.

use posecoach_core::{LandmarkFrame, Phase, Result};

use crate::exercise::ExerciseKind;
use crate::feedback::{ExerciseFeedback, Inference, RepEvent};
use crate::gate::VisibilityGate;
use crate::rep_counter::RepCounter;

/// One exercise's detector. Owns its counter exclusively; a changed exercise
/// needs a new detector.
#[derive(Debug, Clone)]
pub struct ExerciseDetector {
    kind: ExerciseKind,
    counter: RepCounter,
    gate: VisibilityGate,
}

impl ExerciseDetector {
    pub fn new(kind: ExerciseKind) -> Self {
        Self::with_gate(kind, VisibilityGate::disabled())
    }

    pub fn with_gate(kind: ExerciseKind, gate: VisibilityGate) -> Self {
        Self {
            kind,
            counter: RepCounter::new(),
            gate,
        }
    }

    /// Analyze one frame.
    ///
    /// Only fails when the visibility gate rejects the frame, in which case the
    /// counter is left untouched.
    pub fn infer(&mut self, frame: &LandmarkFrame) -> Result<Inference> {
        let profile = self.kind.profile();
        self.gate.check(frame, &profile.required_landmarks())?;

        let signal = profile.measure(frame);
        let mut cues = profile.advisory_cues(&signal);

        let rep = self
            .counter
            .update(profile.is_down(&signal), profile.is_up(&signal))
            .map(|count| RepEvent {
                exercise: self.kind,
                count,
            });

        if let Some(event) = rep {
            tracing::info!(exercise = %self.kind, reps = event.count, "rep completed");
            cues.push(profile.rep_cue(event.count));
        }

        Ok(Inference {
            feedback: ExerciseFeedback {
                name: self.kind.id().to_string(),
                reps: self.counter.reps(),
                phase: self.counter.phase(),
                cues,
            },
            rep,
            signal,
        })
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn reps(&self) -> u32 {
        self.counter.reps()
    }

    pub fn phase(&self) -> Phase {
        self.counter.phase()
    }

    pub fn counter(&self) -> &RepCounter {
        &self.counter
    }

    pub fn gate(&self) -> VisibilityGate {
        self.gate
    }

    pub fn reset(&mut self) {
        self.counter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posecoach_core::{BodyLandmark, Error, Point};

    /// Both arms bent to `deg` at the elbow.
    fn arms_at(deg: f64) -> LandmarkFrame {
        let rad = deg.to_radians();
        let mut frame = LandmarkFrame::empty();
        for (shoulder, elbow, wrist, x) in [
            (
                BodyLandmark::LeftShoulder,
                BodyLandmark::LeftElbow,
                BodyLandmark::LeftWrist,
                100.0,
            ),
            (
                BodyLandmark::RightShoulder,
                BodyLandmark::RightElbow,
                BodyLandmark::RightWrist,
                300.0,
            ),
        ] {
            frame = frame
                .with(shoulder, Point::new(x, 100.0))
                .with(elbow, Point::new(x, 200.0))
                .with(
                    wrist,
                    Point::new(x + 100.0 * rad.sin(), 200.0 - 100.0 * rad.cos()),
                );
        }
        frame
    }

    fn legs_at(left: f64, right: f64) -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty();
        for (hip, knee, ankle, x, deg) in [
            (
                BodyLandmark::LeftHip,
                BodyLandmark::LeftKnee,
                BodyLandmark::LeftAnkle,
                100.0,
                left,
            ),
            (
                BodyLandmark::RightHip,
                BodyLandmark::RightKnee,
                BodyLandmark::RightAnkle,
                300.0,
                right,
            ),
        ] {
            let rad = deg.to_radians();
            frame = frame
                .with(hip, Point::new(x, 300.0))
                .with(knee, Point::new(x, 400.0))
                .with(
                    ankle,
                    Point::new(x + 100.0 * rad.sin(), 400.0 - 100.0 * rad.cos()),
                );
        }
        frame
    }

    #[test]
    fn test_arm_fixture_angle() {
        let mut detector = ExerciseDetector::new(ExerciseKind::Pushup);
        let inference = detector.infer(&arms_at(120.0)).unwrap();
        assert!((inference.signal.angle - 120.0).abs() < 1e-6);
        assert!(inference.signal.depth_ratio.is_none());
    }

    #[test]
    fn test_pushup_rep_cycle() {
        let mut detector = ExerciseDetector::new(ExerciseKind::Pushup);

        let top = detector.infer(&arms_at(175.0)).unwrap();
        assert_eq!(top.feedback.cues, vec!["Lower down"]);
        assert_eq!(top.feedback.phase, Phase::Up);

        let bottom = detector.infer(&arms_at(75.0)).unwrap();
        assert_eq!(bottom.feedback.phase, Phase::Down);
        assert_eq!(bottom.feedback.cues, vec!["Keep elbows tucked"]);

        let done = detector.infer(&arms_at(168.0)).unwrap();
        assert_eq!(
            done.rep,
            Some(RepEvent {
                exercise: ExerciseKind::Pushup,
                count: 1
            })
        );
        assert_eq!(done.feedback.cues, vec!["Pushup rep 1"]);
        assert_eq!(done.feedback.name, "pushup");
        assert_eq!(detector.reps(), 1);
    }

    #[test]
    fn test_advisory_precedes_rep_cue() {
        let mut detector = ExerciseDetector::new(ExerciseKind::ChairDip);
        detector.infer(&arms_at(90.0)).unwrap();
        let done = detector.infer(&arms_at(172.0)).unwrap();
        assert_eq!(
            done.feedback.cues,
            vec!["Lower body by bending elbows", "Chair dip rep 1"]
        );
    }

    #[test]
    fn test_lunge_uses_more_bent_knee() {
        let mut detector = ExerciseDetector::new(ExerciseKind::Lunge);
        let inference = detector.infer(&legs_at(178.0, 95.0)).unwrap();
        assert!((inference.signal.angle - 95.0).abs() < 1e-6);
        assert_eq!(inference.feedback.phase, Phase::Down);
    }

    #[test]
    fn test_side_lunge_band() {
        let mut detector = ExerciseDetector::new(ExerciseKind::SideLunge);
        // 105 is down for the side lunge but not for the forward lunge
        let inference = detector.infer(&legs_at(105.0, 175.0)).unwrap();
        assert_eq!(inference.feedback.phase, Phase::Down);

        let mut lunge = ExerciseDetector::new(ExerciseKind::Lunge);
        assert_eq!(
            lunge.infer(&legs_at(105.0, 175.0)).unwrap().feedback.phase,
            Phase::Up
        );
    }

    #[test]
    fn test_hammer_curl_cycle() {
        let mut detector = ExerciseDetector::new(ExerciseKind::HammerCurl);
        let extended = detector.infer(&arms_at(165.0)).unwrap();
        assert_eq!(extended.feedback.cues, vec!["Curl up"]);
        let curled = detector.infer(&arms_at(55.0)).unwrap();
        assert_eq!(curled.feedback.cues, vec!["Lower slowly; control the descent"]);
        assert_eq!(curled.feedback.phase, Phase::Down);
        // 150 is inside the band: no rep yet
        assert!(detector.infer(&arms_at(150.0)).unwrap().rep.is_none());
        let done = detector.infer(&arms_at(158.0)).unwrap();
        assert_eq!(done.rep.map(|r| r.count), Some(1));
        assert_eq!(done.feedback.cues, vec!["Hammer curl rep 1"]);
    }

    #[test]
    fn test_sentinel_frame_reads_as_down() {
        // All-invisible frame: every angle is degenerate (0.0) and
        // reads as "down" when ungated.
        let mut detector = ExerciseDetector::new(ExerciseKind::Pushup);
        let inference = detector.infer(&LandmarkFrame::empty()).unwrap();
        assert_eq!(inference.signal.angle, 0.0);
        assert_eq!(inference.feedback.phase, Phase::Down);
    }

    #[test]
    fn test_gate_preserves_counter() {
        let mut detector =
            ExerciseDetector::with_gate(ExerciseKind::Pushup, VisibilityGate::with_min_visibility(0.5));
        detector.infer(&arms_at(80.0)).unwrap();
        let before = *detector.counter();

        let err = detector.infer(&LandmarkFrame::empty()).unwrap_err();
        assert!(matches!(err, Error::OccludedLandmark { .. }));
        assert_eq!(*detector.counter(), before);

        let done = detector.infer(&arms_at(170.0)).unwrap();
        assert_eq!(done.rep.map(|r| r.count), Some(1));
    }

    #[test]
    fn test_reset() {
        let mut detector = ExerciseDetector::new(ExerciseKind::Pushup);
        detector.infer(&arms_at(80.0)).unwrap();
        detector.infer(&arms_at(170.0)).unwrap();
        assert_eq!(detector.reps(), 1);
        detector.reset();
        assert_eq!(detector.reps(), 0);
        assert_eq!(detector.phase(), Phase::Up);
    }
}
