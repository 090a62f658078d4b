use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use giftfeed::app::{self, Input};
use giftfeed_core::config::Config;
use giftfeed_pipeline::StdoutSink;

#[derive(Parser)]
#[command(name = "giftfeed", about = "Live-room gift feed ticker")]
struct Cli {
    /// Read envelopes from this file (one JSON object per line) instead of stdin.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Config file. Defaults to ~/.config/giftfeed/config.toml.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Initial filter text, `|`-separated OR terms.
    #[arg(long, short)]
    filter: Option<String>,

    /// Worker pool size.
    #[arg(long)]
    workers: Option<usize>,

    /// Write debug logs to /tmp/giftfeed-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/giftfeed-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("giftfeed debug log started; tail -f /tmp/giftfeed-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(filter) = cli.filter {
        config.filter.initial = filter;
    }
    if let Some(workers) = cli.workers {
        config.pipeline.workers = workers;
    }
    config.validate()?;

    let input = cli.input.map_or(Input::Stdin, Input::File);
    app::run(&config, input, Arc::new(StdoutSink)).await?;
    Ok(())
}
