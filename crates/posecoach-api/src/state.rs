//! Shared application state.

use posecoach_dataset::CsvSampleWriter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::recorder::SampleRecorder;
use crate::voice::{TracingSpeaker, VoiceAnnouncer};

/// State handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ApiConfig,
    recorder: Option<SampleRecorder>,
    voice: Option<VoiceAnnouncer>,
    active_sessions: AtomicUsize,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        recorder: Option<SampleRecorder>,
        voice: Option<VoiceAnnouncer>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                recorder,
                voice,
                active_sessions: AtomicUsize::new(0),
            }),
        }
    }

    /// CSV dataset recorder, plus a logging announcer when voice is enabled.
    /// Must be called inside a tokio runtime.
    pub fn from_config(config: ApiConfig) -> Self {
        let recorder = SampleRecorder::spawn(
            Arc::new(CsvSampleWriter::new(&config.dataset.out_dir)),
            config.dataset.queue_capacity,
        );
        let voice = config.voice.enabled.then(|| {
            VoiceAnnouncer::spawn(
                Arc::new(TracingSpeaker::from_config(&config.voice)),
                config.voice.queue_capacity,
            )
        });
        Self::new(config, Some(recorder), voice)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn recorder(&self) -> Option<&SampleRecorder> {
        self.inner.recorder.as_ref()
    }

    pub fn voice(&self) -> Option<&VoiceAnnouncer> {
        self.inner.voice.as_ref()
    }

    pub fn active_sessions(&self) -> usize {
        self.inner.active_sessions.load(Ordering::Relaxed)
    }

    /// Count a connection as active until the guard is dropped.
    pub fn session_guard(&self) -> SessionGuard {
        self.inner.active_sessions.fetch_add(1, Ordering::Relaxed);
        SessionGuard {
            state: self.clone(),
        }
    }
}

pub struct SessionGuard {
    state: AppState,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state
            .inner
            .active_sessions
            .fetch_sub(1, Ordering::Relaxed);
    }
}
