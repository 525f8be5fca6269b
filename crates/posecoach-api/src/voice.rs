//! Background voice announcements.
//!
//! Cues are queued from the WebSocket handlers and spoken one at a time by a
//! single task, so a slow speaker never stalls frame processing.

use async_trait::async_trait;
use parking_lot::Mutex;
use posecoach_core::{Error, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::VoiceConfig;

/// Something that can say a line of text.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Logs each cue instead of synthesising audio.
#[derive(Debug, Clone)]
pub struct TracingSpeaker {
    rate: u32,
    volume: f32,
}

impl TracingSpeaker {
    pub fn new(rate: u32, volume: f32) -> Self {
        Self { rate, volume }
    }

    pub fn from_config(config: &VoiceConfig) -> Self {
        Self::new(config.rate, config.volume)
    }
}

#[async_trait]
impl Speaker for TracingSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::info!(rate = self.rate, volume = self.volume, "say: {}", text);
        Ok(())
    }
}

/// Cues queued but not yet taken by the speaking task.
#[derive(Debug, Default)]
struct Pending {
    count: usize,
    /// Most recently queued cue, only meaningful while `count > 0`
    tail: Option<String>,
}

/// Queue in front of a [`Speaker`].
pub struct VoiceAnnouncer {
    tx: Mutex<Option<mpsc::Sender<String>>>,
    pending: Arc<Mutex<Pending>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl VoiceAnnouncer {
    /// Start the speaking task. Must be called inside a tokio runtime.
    pub fn spawn(speaker: Arc<dyn Speaker>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(capacity.max(1));
        let pending = Arc::new(Mutex::new(Pending::default()));

        let queue = Arc::clone(&pending);
        let task = tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                {
                    let mut queue = queue.lock();
                    queue.count = queue.count.saturating_sub(1);
                    if queue.count == 0 {
                        queue.tail = None;
                    }
                }
                if let Err(e) = speaker.speak(&text).await {
                    tracing::warn!("voice cue {:?} failed: {}", text, e);
                }
            }
            tracing::debug!("voice announcer stopped");
        });

        Self {
            tx: Mutex::new(Some(tx)),
            pending,
            task: Mutex::new(Some(task)),
        }
    }

    /// Queue `text` for speaking.
    ///
    /// Returns `Ok(false)` when the text is empty or equals the cue at the
    /// tail of the pending queue. A cue that was already spoken may be queued
    /// again. A full queue drops the cue with [`Error::Voice`].
    pub fn announce(&self, text: &str) -> Result<bool> {
        if text.is_empty() {
            return Ok(false);
        }

        let mut pending = self.pending.lock();
        if pending.count > 0 && pending.tail.as_deref() == Some(text) {
            return Ok(false);
        }

        let tx = self.tx.lock();
        let tx = tx
            .as_ref()
            .ok_or_else(|| Error::Voice("announcer stopped".to_string()))?;
        tx.try_send(text.to_string()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => Error::Voice(format!("queue full, dropped {text:?}")),
            mpsc::error::TrySendError::Closed(_) => Error::Voice("announcer stopped".to_string()),
        })?;

        pending.count += 1;
        pending.tail = Some(text.to_string());
        Ok(true)
    }

    /// Stop accepting cues, speak what is already queued, then end the task.
    pub async fn shutdown(&self) {
        drop(self.tx.lock().take());
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!("voice task ended abnormally: {}", e);
            }
        }
    }
}
