//! Line-framed frame sources: one JSON envelope per line.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Forward every non-blank line of `reader` as a frame. Stops early if the
/// frame queue is closed. Returns the number of frames forwarded.
pub async fn pump_lines<R>(reader: R, frames: mpsc::Sender<String>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    while let Some(line) = lines.next_line().await.context("reading frame")? {
        if line.trim().is_empty() {
            continue;
        }
        if frames.send(line).await.is_err() {
            tracing::debug!(forwarded, "frame queue closed; source stopping");
            break;
        }
        forwarded += 1;
    }
    Ok(forwarded)
}

pub async fn pump_stdin(frames: mpsc::Sender<String>) -> Result<usize> {
    pump_lines(BufReader::new(tokio::io::stdin()), frames).await
}

pub async fn pump_file(path: &Path, frames: mpsc::Sender<String>) -> Result<usize> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    pump_lines(BufReader::new(file), frames).await
}
