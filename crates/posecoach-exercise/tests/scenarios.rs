//! End-to-end rep counting scenarios over synthetic landmark sequences.

use posecoach_core::{BodyLandmark, LandmarkFrame, Phase, Point};
use posecoach_exercise::{ExerciseDetector, ExerciseKind, FeedbackSession, SessionOptions};

/// Place both arms so the shoulder-elbow-wrist angle is `deg`. Arms hang from
/// shoulders already in the frame, or from a default position if none are.
fn with_arms(mut frame: LandmarkFrame, deg: f64) -> LandmarkFrame {
    let rad = deg.to_radians();
    for (shoulder, elbow, wrist, x) in [
        (BodyLandmark::LeftShoulder, BodyLandmark::LeftElbow, BodyLandmark::LeftWrist, 100.0),
        (BodyLandmark::RightShoulder, BodyLandmark::RightElbow, BodyLandmark::RightWrist, 300.0),
    ] {
        let anchor = if frame[shoulder].visibility > 0.0 {
            frame[shoulder]
        } else {
            Point::new(x, 100.0)
        };
        let elbow_point = Point::new(anchor.x, anchor.y + 100.0);
        frame = frame
            .with(shoulder, anchor)
            .with(elbow, elbow_point)
            .with(
                wrist,
                Point::new(
                    elbow_point.x + 100.0 * rad.sin(),
                    elbow_point.y - 100.0 * rad.cos(),
                ),
            );
    }
    frame
}

/// Standing figure with vertical shins, thighs bent so the knee angle is
/// `deg`, and a short torso directly above the hips. The depth ratio follows
/// the knee angle: about 0.67 upright, about 0.60 at 70 degrees.
fn with_legs(mut frame: LandmarkFrame, deg: f64) -> LandmarkFrame {
    let rad = deg.to_radians();
    for (shoulder, hip, knee, ankle, x) in [
        (
            BodyLandmark::LeftShoulder,
            BodyLandmark::LeftHip,
            BodyLandmark::LeftKnee,
            BodyLandmark::LeftAnkle,
            100.0,
        ),
        (
            BodyLandmark::RightShoulder,
            BodyLandmark::RightHip,
            BodyLandmark::RightKnee,
            BodyLandmark::RightAnkle,
            300.0,
        ),
    ] {
        let hip_point = Point::new(x + 100.0 * rad.sin(), 400.0 + 100.0 * rad.cos());
        frame = frame
            .with(ankle, Point::new(x, 500.0))
            .with(knee, Point::new(x, 400.0))
            .with(hip, hip_point)
            .with(shoulder, Point::new(hip_point.x, hip_point.y - 100.0));
    }
    frame
}

fn arms(deg: f64) -> LandmarkFrame {
    with_arms(LandmarkFrame::empty(), deg)
}

fn legs(deg: f64) -> LandmarkFrame {
    with_legs(LandmarkFrame::empty(), deg)
}

#[test]
fn pushup_sweep_counts_one_rep_on_first_up_frame() {
    let sweep: Vec<f64> = (0..=19)
        .map(|i| 180.0 - 5.0 * i as f64)
        .chain((1..=19).map(|i| 85.0 + 5.0 * i as f64))
        .collect();
    assert_eq!(sweep.first(), Some(&180.0));
    assert_eq!(sweep[19], 85.0);
    assert_eq!(sweep.last(), Some(&180.0));

    let mut detector = ExerciseDetector::new(ExerciseKind::Pushup);
    let mut been_down = false;
    let mut rep_frames = Vec::new();
    let mut prev_angle = f64::NAN;

    for (i, deg) in sweep.iter().enumerate() {
        let inference = detector.infer(&arms(*deg)).unwrap();
        if inference.signal.angle < 95.0 {
            been_down = true;
        }
        if let Some(event) = inference.rep {
            assert!(been_down);
            assert!(inference.signal.angle > 165.0);
            // the previous frame was still inside or below the band
            assert!(prev_angle <= 165.0);
            rep_frames.push((i, event.count));
        }
        prev_angle = inference.signal.angle;
    }

    assert_eq!(rep_frames.len(), 1);
    assert_eq!(rep_frames[0].1, 1);
    assert_eq!(detector.reps(), 1);
}

#[test]
fn jitter_above_up_threshold_adds_no_reps() {
    let mut detector = ExerciseDetector::new(ExerciseKind::Pushup);
    detector.infer(&arms(170.0)).unwrap();
    detector.infer(&arms(90.0)).unwrap();
    assert_eq!(detector.infer(&arms(170.0)).unwrap().rep.map(|r| r.count), Some(1));

    for i in 0..500 {
        let deg = if i % 2 == 0 { 166.0 } else { 170.0 };
        let inference = detector.infer(&arms(deg)).unwrap();
        assert!(inference.rep.is_none());
        assert_eq!(inference.feedback.reps, 1);
        assert_eq!(inference.feedback.phase, Phase::Up);
    }
}

#[test]
fn jitter_inside_band_after_down_counts_once() {
    // hovering around the down threshold must not toggle reps either
    let mut detector = ExerciseDetector::new(ExerciseKind::Pushup);
    for i in 0..200 {
        let deg = if i % 2 == 0 { 93.0 } else { 97.0 };
        assert!(detector.infer(&arms(deg)).unwrap().rep.is_none());
    }
    assert_eq!(detector.phase(), Phase::Down);
    assert_eq!(detector.infer(&arms(170.0)).unwrap().rep.map(|r| r.count), Some(1));
    assert_eq!(detector.reps(), 1);
}

#[test]
fn no_rep_without_prior_down_phase() {
    for kind in ExerciseKind::ALL {
        let mut detector = ExerciseDetector::new(kind);
        for i in 0..100 {
            let deg = 170.0 + (i % 10) as f64;
            let frame = with_arms(with_legs(LandmarkFrame::empty(), deg), deg);
            let inference = detector.infer(&frame).unwrap();
            assert!(inference.rep.is_none(), "{kind} counted a rep");
        }
        assert_eq!(detector.reps(), 0, "{kind}");
        assert_eq!(detector.phase(), Phase::Up, "{kind}");
    }
}

#[test]
fn squat_scenario_trace() {
    let knee_angles = [175.0, 160.0, 95.0, 70.0, 95.0, 165.0, 178.0];
    let mut detector = ExerciseDetector::new(ExerciseKind::Squat);

    let mut phases = Vec::new();
    let mut reps = Vec::new();
    let mut rep_cues = Vec::new();

    for (i, deg) in knee_angles.iter().enumerate() {
        let inference = detector.infer(&legs(*deg)).unwrap();
        phases.push(inference.feedback.phase);
        reps.push(inference.feedback.reps);
        for cue in &inference.feedback.cues {
            if cue == "Squat rep 1" {
                rep_cues.push(i);
            }
        }
        let ratio = inference.signal.depth_ratio.unwrap();
        assert!(ratio > 0.45, "frame {i} depth ratio {ratio}");
    }

    use Phase::{Down, Up};
    assert_eq!(phases, vec![Up, Up, Down, Down, Down, Up, Up]);
    assert_eq!(reps, vec![0, 0, 0, 0, 0, 1, 1]);
    assert_eq!(rep_cues, vec![5]);
}

#[test]
fn squat_cues_at_extremes() {
    let mut detector = ExerciseDetector::new(ExerciseKind::Squat);
    let standing = detector.infer(&legs(178.0)).unwrap();
    assert_eq!(standing.feedback.cues, vec!["Start bending knees to go down"]);
    let collapsed = detector.infer(&legs(60.0)).unwrap();
    assert_eq!(collapsed.feedback.cues, vec!["Knees too closed; avoid collapsing"]);
}

#[test]
fn exercises_are_isolated() {
    // arms do two pushup reps while legs do one squat rep, in the same frames
    let script: [(f64, f64); 8] = [
        (175.0, 178.0),
        (90.0, 178.0),
        (170.0, 90.0),
        (90.0, 90.0),
        (170.0, 90.0),
        (170.0, 175.0),
        (170.0, 178.0),
        (90.0, 178.0),
    ];
    let frames: Vec<LandmarkFrame> = script
        .iter()
        .map(|(arm, leg)| with_arms(with_legs(LandmarkFrame::empty(), *leg), *arm))
        .collect();

    let mut squat = ExerciseDetector::new(ExerciseKind::Squat);
    let mut pushup = ExerciseDetector::new(ExerciseKind::Pushup);
    for frame in &frames {
        squat.infer(frame).unwrap();
        pushup.infer(frame).unwrap();
    }
    assert_eq!(squat.reps(), 1);
    assert_eq!(pushup.reps(), 2);

    // running alone gives the same counts
    let mut solo = ExerciseDetector::new(ExerciseKind::Squat);
    for frame in &frames {
        solo.infer(frame).unwrap();
    }
    assert_eq!(solo.reps(), squat.reps());
    assert_eq!(solo.phase(), squat.phase());
}

#[test]
fn sessions_on_separate_threads_do_not_interact() {
    let handles: Vec<_> = [("Pushup", 3usize), ("Chair Dip", 5usize)]
        .into_iter()
        .map(|(name, cycles)| {
            std::thread::spawn(move || {
                let mut session = FeedbackSession::new(name, SessionOptions::default()).unwrap();
                for _ in 0..cycles {
                    session.process(&arms(90.0)).unwrap();
                    session.process(&arms(170.0)).unwrap();
                }
                session.reps()
            })
        })
        .collect();

    let counts: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![3, 5]);
}

#[test]
fn plank_is_rejected_at_session_creation() {
    let result = FeedbackSession::new("Plank", SessionOptions::default());
    assert!(matches!(
        result,
        Err(posecoach_core::Error::UnknownExercise(ref name)) if name == "Plank"
    ));
}
