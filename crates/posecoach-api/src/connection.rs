//! Per-connection session handling for `/ws/pose`.

use posecoach_dataset::Sample;
use posecoach_exercise::{ExerciseKind, FeedbackSession, SessionOptions};
use uuid::Uuid;

use crate::protocol::{ClientMessage, FeedbackPayload, LandmarkLayout, ServerMessage};
use crate::state::AppState;

/// Result of handling one client message.
#[derive(Debug)]
pub struct Outcome {
    pub reply: ServerMessage,
    /// Cue for the voice announcer
    pub voice_cue: Option<String>,
    /// Sample for the dataset recorder
    pub sample: Option<Sample>,
}

impl From<ServerMessage> for Outcome {
    fn from(reply: ServerMessage) -> Self {
        Self {
            reply,
            voice_cue: None,
            sample: None,
        }
    }
}

/// One client's session. Nothing here is shared with other connections.
pub struct PoseConnection {
    id: Uuid,
    state: AppState,
    session: Option<FeedbackSession>,
}

impl PoseConnection {
    pub fn new(state: AppState) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            session: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> Option<&FeedbackSession> {
        self.session.as_ref()
    }

    /// Parse and handle one text frame.
    pub fn handle_text(&mut self, text: &str) -> Outcome {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                tracing::debug!(connection = %self.id, "bad client message: {}", e);
                ServerMessage::error(format!("invalid message: {e}")).into()
            }
        }
    }

    pub fn handle_message(&mut self, message: ClientMessage) -> Outcome {
        match message {
            ClientMessage::Config {
                exercise,
                log_enabled,
            } => self.configure(exercise, log_enabled),
            ClientMessage::Landmarks { landmarks, layout } => self.process(&landmarks, layout),
            ClientMessage::Ping => ServerMessage::Pong.into(),
        }
    }

    fn configure(&mut self, exercise: Option<String>, log_enabled: Option<bool>) -> Outcome {
        let config = self.state.config();
        let name = exercise.unwrap_or_else(|| config.session.default_exercise.clone());

        let kind = match ExerciseKind::from_name(&name) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(connection = %self.id, "rejected config: {}", e);
                return ServerMessage::error(e.to_string()).into();
            }
        };

        let options = SessionOptions {
            min_visibility: config.session.min_visibility,
            log_samples: log_enabled.unwrap_or(config.dataset.enabled),
            sample_every: config.dataset.sample_every,
        };
        self.session = Some(FeedbackSession::for_kind(kind, options));
        tracing::info!(connection = %self.id, exercise = %kind, "session configured");

        ServerMessage::ConfigAck {
            exercise: kind.display_name().to_string(),
        }
        .into()
    }

    fn process(&mut self, rows: &[Vec<f64>], layout: LandmarkLayout) -> Outcome {
        let Some(session) = self.session.as_mut() else {
            return ServerMessage::error("send a config message before landmarks").into();
        };

        let frame = match layout.to_frame(rows) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(connection = %self.id, "unreadable frame: {}", e);
                return ServerMessage::Skipped {
                    reason: e.to_string(),
                }
                .into();
            }
        };

        let update = match session.process(&frame) {
            Ok(update) => update,
            Err(e) if e.is_frame_error() => {
                return ServerMessage::Skipped {
                    reason: e.to_string(),
                }
                .into()
            }
            Err(e) => return ServerMessage::error(e.to_string()).into(),
        };

        let sample = update.log_sample.then(|| {
            Sample::new(
                session.exercise().id(),
                update.feedback.phase.as_str(),
                &frame,
            )
        });

        Outcome {
            reply: ServerMessage::Result {
                feedback: FeedbackPayload::from(&update),
                rep: update.rep,
            },
            voice_cue: update.voice_cue,
            sample,
        }
    }
}
