//! giftfeed-core: classification, extraction and aggregation for live-room
//! gift feeds.
//!
//! This crate is the synchronous half of giftfeed: every function here is pure
//! or owns its state exclusively, so the async pipeline can call it from any
//! worker without locking.
//!
//! # Data flow
//!
//! ```text
//! raw line ──► classifier ──► extract ──► Record
//!                                           │
//!            sync payload ──► Snapshot ─────┘──► Aggregator ──► summary text
//! ```

pub mod classifier;
pub mod config;
pub mod extract;
pub mod filter;
pub mod markup;
pub mod snapshot;
pub mod store;
pub mod tables;
pub mod timestamp;
pub mod types;

pub use classifier::classify;
pub use extract::{extract, extract_egg, extract_gift, extract_lottery, ExtractError};
pub use filter::{Aggregator, FilterQuery};
pub use snapshot::{Selection, Snapshot, SnapshotError};
pub use store::{MessageLog, MessageSource};
pub use timestamp::LiveTimestamp;
pub use types::{Category, EggRecord, GiftRecord, LotteryRecord, Record, RecordKind};
