//! giftfeed-pipeline: the concurrent half of giftfeed.
//!
//! ```text
//! source ──► frames (bounded) ──► N workers ──► updates ──► consumer ──► display writer ──► sink
//!                                     │                                        ▲
//!                                     └──── revert timer (exit-notice field) ──┘
//! ```

pub mod consumer;
pub mod dispatch;
pub mod display;
pub mod envelope;
pub mod pipeline;
pub mod revert;
pub mod source;

pub use consumer::Session;
pub use dispatch::{DispatchError, Update};
pub use display::{DisplayHandle, DisplaySink, MemorySink, SinkError, StdoutSink};
pub use envelope::{Envelope, EnvelopeError, Inbound};
pub use pipeline::{Controls, Pipeline, PipelineError};
pub use revert::RevertTimer;
