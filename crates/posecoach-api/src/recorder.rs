//! Background dataset recording.
//!
//! Samples from every connection funnel through one queue and are written
//! in arrival order by a single task.

use parking_lot::Mutex;
use posecoach_core::{Error, Result};
use posecoach_dataset::{Sample, SampleSink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Queue in front of a [`SampleSink`].
pub struct SampleRecorder {
    tx: Mutex<Option<mpsc::Sender<Sample>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SampleRecorder {
    /// Start the writer task. Must be called inside a tokio runtime.
    pub fn spawn(sink: Arc<dyn SampleSink>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Sample>(capacity.max(1));

        let task = tokio::spawn(async move {
            while let Some(sample) = rx.recv().await {
                let sink = Arc::clone(&sink);
                match tokio::task::spawn_blocking(move || sink.write(&sample)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::warn!("error saving sample: {}", e),
                    Err(e) => tracing::error!("dataset write aborted: {}", e),
                }
            }
            tracing::debug!("sample recorder stopped");
        });

        Self {
            tx: Mutex::new(Some(tx)),
            task: Mutex::new(Some(task)),
        }
    }

    /// Queue a sample. A full queue drops it with [`Error::Dataset`].
    pub fn record(&self, sample: Sample) -> Result<()> {
        let tx = self.tx.lock();
        let tx = tx
            .as_ref()
            .ok_or_else(|| Error::Dataset("recorder stopped".to_string()))?;
        tx.try_send(sample).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                Error::Dataset("queue full, sample dropped".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => Error::Dataset("recorder stopped".to_string()),
        })
    }

    /// Stop accepting samples and wait until the queued ones are written.
    pub async fn shutdown(&self) {
        drop(self.tx.lock().take());
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!("recorder task ended abnormally: {}", e);
            }
        }
    }
}
