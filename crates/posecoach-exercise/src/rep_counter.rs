//! Edge-triggered dual-threshold rep counter.
//!
//! The owning detector supplies two independently computed conditions per
//! frame. Because the "down" and "up" thresholds are distinct, the gap between
//! them forms a hysteresis band; the sticky edge flags additionally make sure a
//! rep is reported once per Down->Up traversal even when `up` holds for many
//! consecutive frames.

use posecoach_core::Phase;
use serde::{Deserialize, Serialize};

/// Phase + rep count for one exercise session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepCounter {
    phase: Phase,
    reps: u32,
    down_edge: bool,
    up_edge: bool,
}

impl RepCounter {
    pub fn new() -> Self {
        Self {
            phase: Phase::Up,
            reps: 0,
            down_edge: false,
            up_edge: false,
        }
    }

    /// Feed one frame's conditions.
    ///
    /// Returns the new rep count on the frame a rep completes, `None` otherwise.
    /// Both conditions may be true (or false) in the same frame.
    pub fn update(&mut self, down_condition: bool, up_condition: bool) -> Option<u32> {
        if down_condition && !self.down_edge {
            self.down_edge = true;
            self.phase = Phase::Down;
        }
        if !down_condition {
            self.down_edge = false;
        }

        if up_condition && !self.up_edge && self.phase == Phase::Down {
            self.up_edge = true;
            self.phase = Phase::Up;
            self.reps += 1;
            return Some(self.reps);
        }
        if !up_condition {
            self.up_edge = false;
        }
        None
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new()
    }
}
