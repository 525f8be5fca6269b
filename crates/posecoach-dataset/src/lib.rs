//! # Posecoach-Dataset
//!
//! Collects labelled landmark samples while a session runs, so a model can be
//! trained offline later. One CSV file per exercise, one row per sample:
//!
//! ```text
//! exercise,label,lm0_x,lm0_y,lm0_z,lm0_vis,...,lm32_vis
//! ```

pub mod sample;
pub mod writer;

pub use sample::*;
pub use writer::*;
