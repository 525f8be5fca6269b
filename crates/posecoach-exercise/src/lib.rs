//! # Posecoach-Exercise
//!
//! Turns a stream of landmark frames into rep counts, exercise phase and
//! coaching cues.
//!
//! ## Pipeline
//!
//! 1. **Measure** - each exercise reads a fixed set of joints and derives a
//!    primary angle (plus a depth ratio for squats) via the geometry kernel.
//! 2. **Classify** - the signal is compared against two distinct thresholds,
//!    giving independent `down` and `up` conditions.
//! 3. **Debounce** - a [`RepCounter`] turns those conditions into phase
//!    changes and a single rep event per Down->Up traversal.
//! 4. **Coach** - advisory cues are emitted from posture extremes on every
//!    frame, and a rep cue on the frame a rep completes.
//!
//! The [`FeedbackSession`] aggregator sits on top and decides when output is
//! worth a voice announcement or a dataset sample.

pub mod detector;
pub mod exercise;
pub mod feedback;
pub mod gate;
pub mod rep_counter;
pub mod session;

pub use detector::*;
pub use exercise::*;
pub use feedback::*;
pub use gate::*;
pub use rep_counter::*;
pub use session::*;
