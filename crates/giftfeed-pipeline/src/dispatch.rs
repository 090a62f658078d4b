//! Dispatcher: a fixed pool of workers that decode inbound frames, route them
//! by envelope type and post the results onto the single consumer channel.
//!
//! Workers never touch aggregation state. The only side effect a worker
//! performs directly is arming the exit-notice [`RevertTimer`]; everything
//! else becomes an [`Update`] for the consumer.

use std::sync::Arc;

use giftfeed_core::{MessageSource, Snapshot};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::envelope::{self, passthrough_text, EnvelopeError, Inbound};
use crate::revert::RevertTimer;

/// Everything the consumer applies, in dequeue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Text forwarded by a worker, recorded in the message log.
    Message { source: MessageSource, text: String },
    /// A fresh snapshot replacing the previous one wholesale.
    Snapshot(Snapshot),
    /// New filter text.
    SetFilter(String),
    SelectDate(String),
    SelectFile(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    #[error("consumer channel closed")]
    ConsumerClosed,
}

pub struct Dispatcher {
    revert: Arc<RevertTimer>,
    updates: mpsc::UnboundedSender<Update>,
}

impl Dispatcher {
    pub fn new(revert: Arc<RevertTimer>, updates: mpsc::UnboundedSender<Update>) -> Self {
        Self { revert, updates }
    }

    /// Decode, route and act on one raw frame.
    pub fn handle_frame(&self, frame: &str) -> Result<(), DispatchError> {
        let inbound = envelope::decode(frame)?.route()?;
        let update = match inbound {
            Inbound::ExitNotice(text) => {
                self.revert.show(&text);
                Update::Message { source: MessageSource::ExitNotice, text }
            }
            Inbound::Sync(snapshot) => {
                tracing::debug!(
                    dates = snapshot.dates().count(),
                    records = snapshot.record_count(),
                    "sync snapshot decoded"
                );
                Update::Snapshot(snapshot)
            }
            Inbound::Annotated(text) => Update::Message { source: MessageSource::Annotated, text },
            Inbound::Passthrough(value) => Update::Message {
                source: MessageSource::Passthrough,
                text: passthrough_text(&value),
            },
        };
        self.updates.send(update).map_err(|_| DispatchError::ConsumerClosed)
    }
}

/// Spawn `count` workers sharing one frame queue.
///
/// Each worker exits when the queue is closed and drained, or when the
/// consumer channel goes away. A bad frame is logged and dropped; it never
/// stops the worker.
pub fn spawn_workers(
    count: usize,
    frames: mpsc::Receiver<String>,
    dispatcher: Arc<Dispatcher>,
) -> Vec<JoinHandle<()>> {
    let frames = Arc::new(Mutex::new(frames));
    (0..count.max(1))
        .map(|id| {
            let frames = Arc::clone(&frames);
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let mut handled = 0u64;
                loop {
                    let frame = { frames.lock().await.recv().await };
                    let Some(frame) = frame else { break };
                    match dispatcher.handle_frame(&frame) {
                        Ok(()) => handled += 1,
                        Err(DispatchError::ConsumerClosed) => {
                            tracing::warn!(worker = id, "consumer gone; worker stopping");
                            break;
                        }
                        Err(e) => tracing::warn!(worker = id, error = %e, "frame dropped"),
                    }
                }
                tracing::debug!(worker = id, handled, "worker stopped");
            })
        })
        .collect()
}
