//! Optional visibility gate in front of the detectors.
//!
//! Disabled by default: detectors then measure whatever the estimator supplied,
//! including invisible sentinel points. When a cutoff is set, a frame whose
//! required joints fall below it is rejected before the rep counter sees it.

use posecoach_core::{BodyLandmark, Error, LandmarkFrame, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityGate {
    min_visibility: Option<f64>,
}

impl VisibilityGate {
    pub fn disabled() -> Self {
        Self {
            min_visibility: None,
        }
    }

    pub fn with_min_visibility(min_visibility: f64) -> Self {
        Self {
            min_visibility: Some(min_visibility),
        }
    }

    pub fn from_option(min_visibility: Option<f64>) -> Self {
        Self { min_visibility }
    }

    pub fn min_visibility(&self) -> Option<f64> {
        self.min_visibility
    }

    pub fn is_enabled(&self) -> bool {
        self.min_visibility.is_some()
    }

    /// Fails on the first required landmark below the cutoff.
    pub fn check(&self, frame: &LandmarkFrame, required: &[BodyLandmark]) -> Result<()> {
        let Some(min_visibility) = self.min_visibility else {
            return Ok(());
        };

        for &landmark in required {
            let visibility = frame[landmark].visibility;
            if visibility < min_visibility {
                return Err(Error::OccludedLandmark {
                    landmark,
                    visibility,
                    min_visibility,
                });
            }
        }
        Ok(())
    }
}
