//! HTTP and WebSocket handlers.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Json},
};
use posecoach_exercise::ExerciseKind;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::connection::{Outcome, PoseConnection};
use crate::state::AppState;

// ── REST endpoints ───────────────────────────────────────────────────────────

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Pose Coach API",
        "status": "running",
    }))
}

pub async fn exercises() -> Json<Value> {
    let names: Vec<&str> = ExerciseKind::ALL.iter().map(|k| k.display_name()).collect();
    Json(json!({ "exercises": names }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "active_sessions": state.active_sessions(),
    }))
}

// ── Pose WebSocket ───────────────────────────────────────────────────────────

pub async fn ws_pose_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_pose_socket(socket, state))
}

async fn handle_pose_socket(mut socket: WebSocket, state: AppState) {
    let _guard = state.session_guard();
    let mut conn = PoseConnection::new(state.clone());
    info!(connection = %conn.id(), "WebSocket client connected (pose)");

    while let Some(msg) = socket.recv().await {
        let outcome = match msg {
            Ok(Message::Text(text)) => conn.handle_text(&text),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(connection = %conn.id(), "WebSocket receive error: {}", e);
                break;
            }
        };

        let json = dispatch(&state, outcome);
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }

    let (reps, skipped) = conn
        .session()
        .map(|s| (s.reps(), s.frames_skipped()))
        .unwrap_or_default();
    info!(connection = %conn.id(), reps, skipped, "WebSocket client disconnected (pose)");
}

/// Hand side effects to the collaborators and serialise the reply.
fn dispatch(state: &AppState, outcome: Outcome) -> String {
    if let (Some(sample), Some(recorder)) = (outcome.sample, state.recorder()) {
        if let Err(e) = recorder.record(sample) {
            warn!("{}", e);
        }
    }

    if let (Some(cue), Some(voice)) = (outcome.voice_cue.as_deref(), state.voice()) {
        if let Err(e) = voice.announce(cue) {
            warn!("{}", e);
        }
    }

    match serde_json::to_string(&outcome.reply) {
        Ok(json) => json,
        Err(e) => {
            warn!("failed to serialise reply: {}", e);
            json!({ "type": "error", "message": "internal error" }).to_string()
        }
    }
}
