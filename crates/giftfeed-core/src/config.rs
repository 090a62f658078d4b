//! Configuration types for giftfeed.
//!
//! [`Config::load`] reads `~/.config/giftfeed/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[pipeline]
workers           = 4
frame_buffer      = 256
tick_ms           = 100
shutdown_grace_ms = 2000

[display]
exit_field      = "退出直播间消息"
default_text    = "欢迎来到直播间"
revert_delay_ms = 7000
summary_field   = "滚动字幕"
recent_window   = 3

[filter]
separator = "|"
initial   = ""

[log]
capacity = 500
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),
    #[error("failed to write default config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// `[pipeline]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Capacity of the raw inbound frame queue feeding the workers.
    #[serde(default = "default_frame_buffer")]
    pub frame_buffer: usize,
    /// Consumer poll tick.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

fn default_workers() -> usize { 4 }
fn default_frame_buffer() -> usize { 256 }
fn default_tick_ms() -> u64 { 100 }
fn default_shutdown_grace_ms() -> u64 { 2000 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            frame_buffer: default_frame_buffer(),
            tick_ms: default_tick_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl PipelineConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

/// `[display]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Display field that shows exit notices.
    #[serde(default = "default_exit_field")]
    pub exit_field: String,
    /// Text restored on the exit field once a notice expires.
    #[serde(default = "default_default_text")]
    pub default_text: String,
    #[serde(default = "default_revert_delay_ms")]
    pub revert_delay_ms: u64,
    /// Display field that shows the jackpot summary.
    #[serde(default = "default_summary_field")]
    pub summary_field: String,
    /// Number of most recent matching records in the summary.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

fn default_exit_field() -> String { "退出直播间消息".to_string() }
fn default_default_text() -> String { "欢迎来到直播间".to_string() }
fn default_revert_delay_ms() -> u64 { 7000 }
fn default_summary_field() -> String { "滚动字幕".to_string() }
fn default_recent_window() -> usize { 3 }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            exit_field: default_exit_field(),
            default_text: default_default_text(),
            revert_delay_ms: default_revert_delay_ms(),
            summary_field: default_summary_field(),
            recent_window: default_recent_window(),
        }
    }
}

impl DisplayConfig {
    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.revert_delay_ms)
    }
}

/// `[filter]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Filter text applied at startup.
    #[serde(default)]
    pub initial: String,
}

fn default_separator() -> String { "|".to_string() }

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            initial: String::new(),
        }
    }
}

/// `[log]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
}

fn default_log_capacity() -> usize { 500 }

impl Default for LogConfig {
    fn default() -> Self {
        Self { capacity: default_log_capacity() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/giftfeed/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load a specific file layered on top of the built-in defaults. A
    /// missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.workers == 0 {
            return Err(ConfigError::Invalid("pipeline.workers must be at least 1".into()));
        }
        if self.pipeline.frame_buffer == 0 {
            return Err(ConfigError::Invalid("pipeline.frame_buffer must be at least 1".into()));
        }
        if self.pipeline.tick_ms == 0 {
            return Err(ConfigError::Invalid("pipeline.tick_ms must be at least 1".into()));
        }
        if self.display.recent_window == 0 {
            return Err(ConfigError::Invalid("display.recent_window must be at least 1".into()));
        }
        if self.filter.separator.is_empty() {
            return Err(ConfigError::Invalid("filter.separator must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("giftfeed")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
