//! # Posecoach-API
//!
//! Axum server that streams exercise feedback to browser clients. Pose
//! estimation happens client side; the server receives landmark frames and
//! answers with reps, phase and coaching cues.
//!
//! ## Endpoints
//!
//! ### REST
//! - `GET /` - Service banner
//! - `GET /exercises` - Supported exercise names
//! - `GET /health` - Health check with the number of open sessions
//!
//! ### WebSocket
//! - `/ws/pose` - One feedback session per connection, see [`protocol`]

pub mod config;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod recorder;
pub mod routes;
pub mod server;
pub mod state;
pub mod voice;

pub use config::*;
pub use server::*;
pub use state::*;
