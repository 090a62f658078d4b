//! giftfeed: live-room gift feed classifier, extractor and jackpot ticker.
//!
//! Re-exports the two workspace crates so that integration tests and the
//! binary import one path, and hosts the application driver in [`app`].
//!
//! # Architecture
//!
//! ```text
//! Source ──► Dispatcher (N workers) ──► Consumer ──► Display
//!                  │                       │
//!                  └──► Revert timer       └──► Aggregator (filter, jackpots)
//! ```

pub mod app;

pub use giftfeed_core;
pub use giftfeed_pipeline;
