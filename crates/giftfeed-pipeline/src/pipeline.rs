//! Wiring: frame queue, worker pool, consumer and display writer.

use std::sync::Arc;
use std::time::Duration;

use giftfeed_core::config::Config;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::consumer::{run_consumer, Session};
use crate::dispatch::{spawn_workers, Dispatcher, Update};
use crate::display::{spawn_writer, DisplaySink};
use crate::revert::RevertTimer;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline is shutting down")]
    Closed,
    #[error("consumer task failed: {0}")]
    Consumer(#[from] JoinError),
}

/// Clonable handle for selection and filter changes. Requests are applied by
/// the consumer in the same order as worker output.
#[derive(Debug, Clone)]
pub struct Controls {
    updates: mpsc::UnboundedSender<Update>,
}

impl Controls {
    pub fn set_filter(&self, text: impl Into<String>) -> Result<(), PipelineError> {
        self.send(Update::SetFilter(text.into()))
    }

    pub fn select_date(&self, date: impl Into<String>) -> Result<(), PipelineError> {
        self.send(Update::SelectDate(date.into()))
    }

    pub fn select_file(&self, file: impl Into<String>) -> Result<(), PipelineError> {
        self.send(Update::SelectFile(file.into()))
    }

    fn send(&self, update: Update) -> Result<(), PipelineError> {
        self.updates.send(update).map_err(|_| PipelineError::Closed)
    }
}

pub struct Pipeline {
    frames: mpsc::Sender<String>,
    controls: Controls,
    workers: Vec<JoinHandle<()>>,
    consumer: JoinHandle<Session>,
    writer: JoinHandle<()>,
    revert: Arc<RevertTimer>,
    stop_consumer: CancellationToken,
    stop_writer: CancellationToken,
    grace: Duration,
}

impl Pipeline {
    /// Start every task. Must be called from within a tokio runtime.
    pub fn start(config: &Config, sink: Arc<dyn DisplaySink>) -> Self {
        let stop_consumer = CancellationToken::new();
        let stop_writer = CancellationToken::new();

        let (display, writer) = spawn_writer(sink, stop_writer.clone());
        let revert = Arc::new(RevertTimer::new(
            display.clone(),
            config.display.exit_field.as_str(),
            config.display.default_text.as_str(),
            config.display.revert_delay(),
        ));
        display.set_text(&config.display.exit_field, &config.display.default_text);

        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (frames_tx, frames_rx) = mpsc::channel(config.pipeline.frame_buffer);

        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&revert), updates_tx.clone()));
        let workers = spawn_workers(config.pipeline.workers, frames_rx, dispatcher);

        let session = Session::new(config, display);
        let consumer = tokio::spawn(run_consumer(
            session,
            updates_rx,
            config.pipeline.tick(),
            stop_consumer.clone(),
        ));

        tracing::info!(
            workers = config.pipeline.workers,
            frame_buffer = config.pipeline.frame_buffer,
            tick_ms = config.pipeline.tick_ms,
            "pipeline started"
        );

        Self {
            frames: frames_tx,
            controls: Controls { updates: updates_tx },
            workers,
            consumer,
            writer,
            revert,
            stop_consumer,
            stop_writer,
            grace: config.pipeline.shutdown_grace(),
        }
    }

    /// Sender for raw inbound frames. Dropping every clone (and the pipeline's
    /// own, on shutdown) lets the workers finish.
    pub fn frames(&self) -> mpsc::Sender<String> {
        self.frames.clone()
    }

    /// Queue one raw frame, waiting for room in the frame buffer.
    pub async fn submit(&self, frame: impl Into<String>) -> Result<(), PipelineError> {
        self.frames
            .send(frame.into())
            .await
            .map_err(|_| PipelineError::Closed)
    }

    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    /// Stop accepting frames, let workers finish queued frames within the
    /// grace period (aborting stragglers), cancel any pending revert, then
    /// stop the consumer and flush the display.
    pub async fn shutdown(self) -> Result<Session, PipelineError> {
        let Pipeline {
            frames,
            controls,
            mut workers,
            consumer,
            mut writer,
            revert,
            stop_consumer,
            stop_writer,
            grace,
        } = self;
        drop(frames);

        let finished = tokio::time::timeout(grace, async {
            for worker in &mut workers {
                if let Err(e) = worker.await {
                    tracing::warn!(error = %e, "worker failed");
                }
            }
        })
        .await;
        if finished.is_err() {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "workers abandoned after grace period");
            for worker in &workers {
                worker.abort();
            }
        }

        if revert.cancel() {
            tracing::debug!("pending revert cancelled");
        }
        drop(revert);
        drop(controls);

        stop_consumer.cancel();
        let session = consumer.await?;

        stop_writer.cancel();
        if tokio::time::timeout(grace, &mut writer).await.is_err() {
            tracing::warn!("display writer abandoned after grace period");
            writer.abort();
        }

        tracing::info!(
            applied = session.applied(),
            logged = session.log().len(),
            "pipeline stopped"
        );
        Ok(session)
    }
}
