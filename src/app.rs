//! Application driver: feed one line-framed input through a pipeline until
//! the input ends or the process is interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use giftfeed_core::config::Config;
use giftfeed_pipeline::source::{pump_file, pump_stdin};
use giftfeed_pipeline::{DisplaySink, Pipeline, Session};

/// Where inbound envelopes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

/// Run until `input` is exhausted or Ctrl-C, then shut the pipeline down
/// and return the final consumer state.
pub async fn run(config: &Config, input: Input, sink: Arc<dyn DisplaySink>) -> Result<Session> {
    let pipeline = Pipeline::start(config, sink);
    let frames = pipeline.frames();

    let pump = async {
        match &input {
            Input::Stdin => pump_stdin(frames).await,
            Input::File(path) => pump_file(path, frames).await,
        }
    };

    let pumped = tokio::select! {
        res = pump => res.map(Some),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
            Ok(None)
        }
    };
    let session = pipeline.shutdown().await?;

    match pumped? {
        Some(frames) => tracing::info!(frames, ?input, "input exhausted"),
        None => tracing::info!(?input, "input abandoned"),
    }
    Ok(session)
}
