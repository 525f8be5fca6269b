//! Supported exercises and their calibrated threshold tables.
//!
//! The numbers below were calibrated empirically. Changing any of them changes
//! which frames count as a rep.

use posecoach_core::{angle, distance, midpoint, BodyLandmark, Error, LandmarkFrame, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::feedback::JointSignal;

/// Closed set of exercises a session can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Squat,
    Pushup,
    Lunge,
    SideLunge,
    HammerCurl,
    ChairDip,
}

impl ExerciseKind {
    /// Selection order as offered to clients.
    pub const ALL: [ExerciseKind; 6] = [
        Self::Squat,
        Self::Pushup,
        Self::Lunge,
        Self::SideLunge,
        Self::HammerCurl,
        Self::ChairDip,
    ];

    /// Resolve a selection name. Accepts display names ("Side Lunge") and ids
    /// ("side_lunge").
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.display_name() == name || kind.id() == name)
            .ok_or_else(|| Error::UnknownExercise(name.to_string()))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Squat => "Squat",
            Self::Pushup => "Pushup",
            Self::Lunge => "Lunge",
            Self::SideLunge => "Side Lunge",
            Self::HammerCurl => "Hammer Curl",
            Self::ChairDip => "Chair Dip",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Pushup => "pushup",
            Self::Lunge => "lunge",
            Self::SideLunge => "side_lunge",
            Self::HammerCurl => "hammer_curl",
            Self::ChairDip => "chair_dip",
        }
    }

    pub fn profile(&self) -> &'static ExerciseProfile {
        match self {
            Self::Squat => &SQUAT,
            Self::Pushup => &PUSHUP,
            Self::Lunge => &LUNGE,
            Self::SideLunge => &SIDE_LUNGE,
            Self::HammerCurl => &HAMMER_CURL,
            Self::ChairDip => &CHAIR_DIP,
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Which joint angle drives an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleSource {
    /// Mean of left and right shoulder-elbow-wrist angles.
    MeanElbow,
    /// Mean of left and right hip-knee-ankle angles.
    MeanKnee,
    /// The more bent of the two hip-knee-ankle angles.
    MinKnee,
}

impl AngleSource {
    fn measure(&self, frame: &LandmarkFrame) -> f64 {
        use BodyLandmark::*;
        match self {
            Self::MeanElbow => {
                let left = angle(&frame[LeftShoulder], &frame[LeftElbow], &frame[LeftWrist]);
                let right = angle(&frame[RightShoulder], &frame[RightElbow], &frame[RightWrist]);
                (left + right) / 2.0
            }
            Self::MeanKnee => {
                let (left, right) = knee_angles(frame);
                (left + right) / 2.0
            }
            Self::MinKnee => {
                let (left, right) = knee_angles(frame);
                left.min(right)
            }
        }
    }

    fn landmarks(&self) -> &'static [BodyLandmark] {
        use BodyLandmark::*;
        match self {
            Self::MeanElbow => &[
                LeftShoulder,
                RightShoulder,
                LeftElbow,
                RightElbow,
                LeftWrist,
                RightWrist,
            ],
            Self::MeanKnee | Self::MinKnee => {
                &[LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle]
            }
        }
    }
}

fn knee_angles(frame: &LandmarkFrame) -> (f64, f64) {
    use BodyLandmark::*;
    (
        angle(&frame[LeftHip], &frame[LeftKnee], &frame[LeftAnkle]),
        angle(&frame[RightHip], &frame[RightKnee], &frame[RightAnkle]),
    )
}

/// Hip-to-ankle distance over shoulder-to-ankle distance, using the midpoints
/// of each left/right pair. Lower means deeper.
pub fn depth_ratio(frame: &LandmarkFrame) -> f64 {
    use BodyLandmark::*;
    let hip_mid = midpoint(&frame[LeftHip], &frame[RightHip]);
    let ankle_mid = midpoint(&frame[LeftAnkle], &frame[RightAnkle]);
    let shoulder_mid = midpoint(&frame[LeftShoulder], &frame[RightShoulder]);
    distance(&hip_mid, &ankle_mid) / distance(&shoulder_mid, &ankle_mid).max(1e-6)
}

/// Depth-ratio thresholds, combined with the angle thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthThresholds {
    /// Ratio below this also counts as down (OR with the angle).
    pub down_below: f64,
    /// Ratio must exceed this to count as up (AND with the angle).
    pub up_above: f64,
}

/// Which side of a bound an advisory cue fires on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Below(f64),
    Above(f64),
}

impl Bound {
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Bound::Below(limit) => value < limit,
            Bound::Above(limit) => value > limit,
        }
    }
}

/// Posture cue emitted whenever the primary angle crosses a bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advisory {
    pub bound: Bound,
    pub cue: &'static str,
}

/// Constant threshold table of one exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseProfile {
    pub angle_source: AngleSource,
    /// Primary angle below this is the "down" posture.
    pub down_below: f64,
    /// Primary angle above this is the "up" posture.
    pub up_above: f64,
    pub depth: Option<DepthThresholds>,
    /// Checked in order; each matching entry adds its cue.
    pub advisories: &'static [Advisory],
    /// Prefix of the rep announcement, e.g. "Squat" in "Squat rep 3".
    pub rep_label: &'static str,
}

impl ExerciseProfile {
    pub fn measure(&self, frame: &LandmarkFrame) -> JointSignal {
        JointSignal {
            angle: self.angle_source.measure(frame),
            depth_ratio: self.depth.map(|_| depth_ratio(frame)),
        }
    }

    pub fn is_down(&self, signal: &JointSignal) -> bool {
        let by_angle = signal.angle < self.down_below;
        match (self.depth, signal.depth_ratio) {
            (Some(depth), Some(ratio)) => by_angle || ratio < depth.down_below,
            _ => by_angle,
        }
    }

    pub fn is_up(&self, signal: &JointSignal) -> bool {
        let by_angle = signal.angle > self.up_above;
        match (self.depth, signal.depth_ratio) {
            (Some(depth), Some(ratio)) => by_angle && ratio > depth.up_above,
            _ => by_angle,
        }
    }

    pub fn advisory_cues(&self, signal: &JointSignal) -> Vec<String> {
        self.advisories
            .iter()
            .filter(|advisory| advisory.bound.holds(signal.angle))
            .map(|advisory| advisory.cue.to_string())
            .collect()
    }

    pub fn rep_cue(&self, count: u32) -> String {
        format!("{} rep {}", self.rep_label, count)
    }

    /// Landmarks the measurement reads.
    pub fn required_landmarks(&self) -> Vec<BodyLandmark> {
        let mut landmarks = self.angle_source.landmarks().to_vec();
        if self.depth.is_some() {
            landmarks.push(BodyLandmark::LeftShoulder);
            landmarks.push(BodyLandmark::RightShoulder);
        }
        landmarks
    }
}

pub const SQUAT: ExerciseProfile = ExerciseProfile {
    angle_source: AngleSource::MeanKnee,
    down_below: 100.0,
    up_above: 160.0,
    depth: Some(DepthThresholds {
        down_below: 0.45,
        up_above: 0.6,
    }),
    advisories: &[
        Advisory {
            bound: Bound::Below(70.0),
            cue: "Knees too closed; avoid collapsing",
        },
        Advisory {
            bound: Bound::Above(170.0),
            cue: "Start bending knees to go down",
        },
    ],
    rep_label: "Squat",
};

pub const PUSHUP: ExerciseProfile = ExerciseProfile {
    angle_source: AngleSource::MeanElbow,
    down_below: 95.0,
    up_above: 165.0,
    depth: None,
    advisories: &[
        Advisory {
            bound: Bound::Above(170.0),
            cue: "Lower down",
        },
        Advisory {
            bound: Bound::Below(80.0),
            cue: "Keep elbows tucked",
        },
    ],
    rep_label: "Pushup",
};

pub const LUNGE: ExerciseProfile = ExerciseProfile {
    angle_source: AngleSource::MinKnee,
    down_below: 100.0,
    up_above: 165.0,
    depth: None,
    advisories: &[Advisory {
        bound: Bound::Above(170.0),
        cue: "Step forward and lower knee",
    }],
    rep_label: "Lunge",
};

pub const SIDE_LUNGE: ExerciseProfile = ExerciseProfile {
    angle_source: AngleSource::MinKnee,
    down_below: 110.0,
    up_above: 165.0,
    depth: None,
    advisories: &[Advisory {
        bound: Bound::Above(170.0),
        cue: "Shift hips to one side and bend the knee",
    }],
    rep_label: "Side lunge",
};

pub const HAMMER_CURL: ExerciseProfile = ExerciseProfile {
    angle_source: AngleSource::MeanElbow,
    down_below: 70.0,
    up_above: 155.0,
    depth: None,
    advisories: &[
        Advisory {
            bound: Bound::Above(160.0),
            cue: "Curl up",
        },
        Advisory {
            bound: Bound::Below(60.0),
            cue: "Lower slowly; control the descent",
        },
    ],
    rep_label: "Hammer curl",
};

pub const CHAIR_DIP: ExerciseProfile = ExerciseProfile {
    angle_source: AngleSource::MeanElbow,
    down_below: 95.0,
    up_above: 165.0,
    depth: None,
    advisories: &[
        Advisory {
            bound: Bound::Above(160.0),
            cue: "Lower body by bending elbows",
        },
        Advisory {
            bound: Bound::Below(80.0),
            cue: "Push through palms to rise",
        },
    ],
    rep_label: "Chair dip",
};
