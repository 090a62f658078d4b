//! Display sink: the external surface that shows named text fields.
//!
//! Sinks are reached only through a [`DisplayHandle`], which queues
//! `(field, text)` requests onto a single writer task. The writer applies
//! requests in queue order and calls the sink off every other task, so a
//! slow sink never stalls the consumer or the workers. Sink failures are
//! logged and dropped; the next aggregation cycle is the retry.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("display rejected {field}: {reason}")]
    Rejected { field: String, reason: String },
    #[error("display is closed")]
    Closed,
}

/// "Set named field to string."
#[async_trait]
pub trait DisplaySink: Send + Sync {
    async fn set_text(&self, field: &str, text: &str) -> Result<(), SinkError>;
}

/// Prints each request to stdout as `[field] text`.
pub struct StdoutSink;

#[async_trait]
impl DisplaySink for StdoutSink {
    async fn set_text(&self, field: &str, text: &str) -> Result<(), SinkError> {
        println!("[{field}] {text}");
        Ok(())
    }
}

/// Collects requests in memory (for testing and headless inspection).
#[derive(Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests received so far, in order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Texts written to one field, in order.
    pub fn texts_for(&self, field: &str) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter(|(f, _)| f == field)
            .map(|(_, t)| t)
            .collect()
    }
}

#[async_trait]
impl DisplaySink for MemorySink {
    async fn set_text(&self, field: &str, text: &str) -> Result<(), SinkError> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((field.to_string(), text.to_string()));
        Ok(())
    }
}

#[derive(Debug)]
struct DisplayRequest {
    field: String,
    text: String,
}

/// Cheap, clonable handle for queueing display requests.
#[derive(Debug, Clone)]
pub struct DisplayHandle {
    tx: mpsc::UnboundedSender<DisplayRequest>,
}

impl DisplayHandle {
    /// Queue a request. Returns `false` if the writer has already stopped.
    pub fn set_text(&self, field: &str, text: &str) -> bool {
        let queued = self
            .tx
            .send(DisplayRequest {
                field: field.to_string(),
                text: text.to_string(),
            })
            .is_ok();
        if !queued {
            tracing::warn!(field, "display writer stopped; request dropped");
        }
        queued
    }
}

/// Spawn the writer task for `sink`.
///
/// The writer runs until every handle is dropped, or until `stop` is
/// cancelled, in which case it applies whatever is already queued and exits.
pub fn spawn_writer(
    sink: Arc<dyn DisplaySink>,
    stop: CancellationToken,
) -> (DisplayHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<DisplayRequest>();
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                request = rx.recv() => match request {
                    Some(request) => apply(sink.as_ref(), request).await,
                    None => break,
                },
                _ = stop.cancelled() => {
                    while let Ok(request) = rx.try_recv() {
                        apply(sink.as_ref(), request).await;
                    }
                    break;
                }
            }
        }
        tracing::debug!("display writer stopped");
    });
    (DisplayHandle { tx }, task)
}

async fn apply(sink: &dyn DisplaySink, request: DisplayRequest) {
    match sink.set_text(&request.field, &request.text).await {
        Ok(()) => tracing::debug!(field = %request.field, bytes = request.text.len(), "display updated"),
        Err(e) => tracing::warn!(field = %request.field, error = %e, "display update failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FailingSink;

    #[async_trait]
    impl DisplaySink for FailingSink {
        async fn set_text(&self, field: &str, _text: &str) -> Result<(), SinkError> {
            Err(SinkError::Rejected {
                field: field.to_string(),
                reason: "offline".into(),
            })
        }
    }

    #[tokio::test]
    async fn writer_applies_in_order() {
        let sink = Arc::new(MemorySink::new());
        let (handle, task) = spawn_writer(sink.clone(), CancellationToken::new());
        handle.set_text("a", "1");
        handle.set_text("b", "2");
        handle.set_text("a", "3");
        drop(handle);
        task.await.unwrap();
        assert_eq!(sink.texts_for("a"), ["1", "3"]);
        assert_eq!(sink.writes().len(), 3);
    }

    #[tokio::test]
    async fn stop_drains_queue() {
        let sink = Arc::new(MemorySink::new());
        let stop = CancellationToken::new();
        let (handle, task) = spawn_writer(sink.clone(), stop.clone());
        handle.set_text("a", "1");
        stop.cancel();
        task.await.unwrap();
        assert_eq!(sink.texts_for("a"), ["1"]);
        // Handle still alive but writer gone.
        assert!(!handle.set_text("a", "2"));
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_writer() {
        let (handle, task) = spawn_writer(Arc::new(FailingSink), CancellationToken::new());
        assert!(handle.set_text("a", "1"));
        assert!(handle.set_text("a", "2"));
        drop(handle);
        task.await.unwrap();
    }
}
