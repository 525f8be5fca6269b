//! # Posecoach-Core
//!
//! Core types and utilities for the Pose Coach real-time exercise feedback
//! system: the fixed 33-slot landmark layout produced by the upstream pose
//! estimator, the geometry kernel used by every exercise detector, and the
//! shared error taxonomy.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
