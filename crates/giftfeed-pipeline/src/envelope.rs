//! Inbound envelope decoding and routing.
//!
//! Every inbound frame is a JSON object `{msgType: integer, msgExtra: any}`.
//! [`decode`] parses the wrapper; [`Envelope::route`] turns it into an
//! [`Inbound`] by the numeric type code:
//!
//! | `msgType` | Meaning                | `msgExtra`                                      |
//! |-----------|------------------------|-------------------------------------------------|
//! | 28        | exit notice            | display text                                    |
//! | 1995      | sync snapshot          | `{msgType: "lotteryRecords", msgExtra: {...}}`  |
//! | 233       | annotated text         | text with `@(word:X)` tokens                    |
//! | other     | passthrough            | forwarded unchanged                             |

use giftfeed_core::markup::strip_word_tokens;
use giftfeed_core::{Snapshot, SnapshotError};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const EXIT_NOTICE: i64 = 28;
pub const SYNC_SNAPSHOT: i64 = 1995;
pub const ANNOTATED_TEXT: i64 = 233;

/// The only sync kind that carries lottery records.
pub const LOTTERY_RECORDS: &str = "lotteryRecords";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing key `{0}`")]
    MissingKey(&'static str),
    #[error("`{key}` should be {expected}")]
    UnexpectedShape {
        key: &'static str,
        expected: &'static str,
    },
    #[error("unsupported sync kind {0:?}")]
    UnsupportedSync(String),
    #[error("bad snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The `{msgType, msgExtra}` wire wrapper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(rename = "msgType")]
    pub msg_type: i64,
    #[serde(rename = "msgExtra", default)]
    pub msg_extra: Value,
}

/// A routed inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    ExitNotice(String),
    Sync(Snapshot),
    /// Annotated text after token rewriting.
    Annotated(String),
    Passthrough(Value),
}

/// Parse one raw frame into an [`Envelope`].
pub fn decode(frame: &str) -> Result<Envelope, EnvelopeError> {
    Ok(serde_json::from_str(frame)?)
}

impl Envelope {
    pub fn route(self) -> Result<Inbound, EnvelopeError> {
        match self.msg_type {
            EXIT_NOTICE => match self.msg_extra {
                Value::Null => Err(EnvelopeError::MissingKey("msgExtra")),
                Value::String(text) => Ok(Inbound::ExitNotice(text)),
                other => Ok(Inbound::ExitNotice(other.to_string())),
            },
            SYNC_SNAPSHOT => route_sync(&self.msg_extra).map(Inbound::Sync),
            ANNOTATED_TEXT => match &self.msg_extra {
                Value::Null => Err(EnvelopeError::MissingKey("msgExtra")),
                Value::String(text) => Ok(Inbound::Annotated(strip_word_tokens(text).into_owned())),
                _ => Err(EnvelopeError::UnexpectedShape {
                    key: "msgExtra",
                    expected: "a string",
                }),
            },
            _ => Ok(Inbound::Passthrough(self.msg_extra)),
        }
    }
}

fn route_sync(extra: &Value) -> Result<Snapshot, EnvelopeError> {
    let kind = extra
        .get("msgType")
        .ok_or(EnvelopeError::MissingKey("msgExtra.msgType"))?;
    let kind = kind.as_str().ok_or(EnvelopeError::UnexpectedShape {
        key: "msgExtra.msgType",
        expected: "a string",
    })?;
    if kind != LOTTERY_RECORDS {
        return Err(EnvelopeError::UnsupportedSync(kind.to_string()));
    }
    let payload = extra
        .get("msgExtra")
        .ok_or(EnvelopeError::MissingKey("msgExtra.msgExtra"))?;
    Ok(Snapshot::from_value(payload)?)
}

/// Text shown for a passthrough payload: strings verbatim, anything else as
/// compact JSON.
pub fn passthrough_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
