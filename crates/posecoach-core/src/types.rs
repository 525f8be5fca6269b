//! Fundamental types for the Pose Coach system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

use crate::error::{Error, Result};

/// 2D keypoint in pixel space as supplied by the pose estimator.
///
/// `z` is carried through but ignored by the geometry kernel. `visibility` is
/// the estimator's confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    1.0
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    pub fn with_visibility(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    /// Sentinel for a slot the estimator could not locate.
    pub fn invisible() -> Self {
        Self::with_visibility(0.0, 0.0, 0.0, 0.0)
    }

    pub fn from_array(v: [f64; 4]) -> Self {
        Self::with_visibility(v[0], v[1], v[2], v[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.visibility]
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::invisible()
    }
}

/// 33-slot body landmark layout (BlazePose ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub const COUNT: usize = 33;

    pub const ALL: [BodyLandmark; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// COCO-17 keypoint index -> 33-slot landmark, for estimators that only
/// produce the COCO body keypoints (face keypoints are not mapped).
pub const COCO17_TO_LANDMARK: [(usize, BodyLandmark); 12] = [
    (5, BodyLandmark::LeftShoulder),
    (6, BodyLandmark::RightShoulder),
    (7, BodyLandmark::LeftElbow),
    (8, BodyLandmark::RightElbow),
    (9, BodyLandmark::LeftWrist),
    (10, BodyLandmark::RightWrist),
    (11, BodyLandmark::LeftHip),
    (12, BodyLandmark::RightHip),
    (13, BodyLandmark::LeftKnee),
    (14, BodyLandmark::RightKnee),
    (15, BodyLandmark::LeftAnkle),
    (16, BodyLandmark::RightAnkle),
];

/// Number of keypoints in a COCO-17 detection.
pub const COCO17_COUNT: usize = 17;

/// One frame of landmarks from the pose estimator.
///
/// Always holds all 33 slots; slots the estimator did not fill carry
/// [`Point::invisible`]. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: [Point; BodyLandmark::COUNT],
}

impl LandmarkFrame {
    /// Frame with every slot set to the invisible sentinel.
    pub fn empty() -> Self {
        Self {
            points: [Point::invisible(); BodyLandmark::COUNT],
        }
    }

    /// Build from estimator output. Trailing points beyond slot 32 are ignored.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        if points.len() < BodyLandmark::COUNT {
            return Err(Error::InvalidFrame {
                expected: BodyLandmark::COUNT,
                actual: points.len(),
            });
        }

        let mut frame = Self::empty();
        frame
            .points
            .copy_from_slice(&points[..BodyLandmark::COUNT]);
        Ok(frame)
    }

    /// Build from `(x, y, z, visibility)` rows.
    pub fn from_tuples(rows: &[[f64; 4]]) -> Result<Self> {
        if rows.len() < BodyLandmark::COUNT {
            return Err(Error::InvalidFrame {
                expected: BodyLandmark::COUNT,
                actual: rows.len(),
            });
        }

        let mut frame = Self::empty();
        for (slot, row) in frame.points.iter_mut().zip(rows) {
            *slot = Point::from_array(*row);
        }
        Ok(frame)
    }

    /// Build from a COCO-17 detection of `(x, y, confidence)` rows.
    pub fn from_coco17(keypoints: &[[f64; 3]]) -> Result<Self> {
        if keypoints.len() < COCO17_COUNT {
            return Err(Error::InvalidFrame {
                expected: COCO17_COUNT,
                actual: keypoints.len(),
            });
        }

        let mut frame = Self::empty();
        for (coco_idx, landmark) in COCO17_TO_LANDMARK {
            let [x, y, conf] = keypoints[coco_idx];
            frame.points[landmark.index()] = Point::with_visibility(x, y, 0.0, conf);
        }
        Ok(frame)
    }

    /// Copy of this frame with one slot replaced.
    pub fn with(mut self, landmark: BodyLandmark, point: Point) -> Self {
        self.points[landmark.index()] = point;
        self
    }

    pub fn get(&self, landmark: BodyLandmark) -> &Point {
        &self.points[landmark.index()]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn to_tuples(&self) -> Vec<[f64; 4]> {
        self.points.iter().map(Point::to_array).collect()
    }
}

impl Default for LandmarkFrame {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<BodyLandmark> for LandmarkFrame {
    type Output = Point;

    fn index(&self, landmark: BodyLandmark) -> &Point {
        self.get(landmark)
    }
}

/// Coarse motion state of a rep cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Down,
    Up,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Down => "down",
            Phase::Up => "up",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
