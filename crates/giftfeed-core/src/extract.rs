//! Extractors: turn a classified line into a structured record.
//!
//! Each extractor owns an ordered list of alternative [`Grammar`]s and returns
//! the record built by the first one that both matches and yields valid
//! fields. Partial matches are never merged. A line no grammar accepts is an
//! ordinary [`ExtractError::NoMatch`], not a fault.
//!
//! | Extractor          | Grammars                                   |
//! |--------------------|--------------------------------------------|
//! | [`extract_gift`]   | gold-fire, normal refine, rate refine      |
//! | [`extract_lottery`]| multiplier reward                          |
//! | [`extract_egg`]    | gashapon egg                               |

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::tables;
use crate::timestamp::{LiveTimestamp, TIMESTAMP_PATTERN};
use crate::types::{Category, EggRecord, GiftRecord, LotteryRecord, Record, RecordKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("no {kind} grammar matched")]
    NoMatch { kind: RecordKind },
    #[error("field `{field}` is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("lottery multiple is zero")]
    ZeroMultiplier,
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

/// One alternative line format: a compiled pattern plus the constructor that
/// turns its captures into a record.
struct Grammar<T> {
    name: &'static str,
    regex: Regex,
    build: fn(&Captures<'_>) -> Result<T, ExtractError>,
}

impl<T> Grammar<T> {
    fn new(
        name: &'static str,
        pattern: String,
        build: fn(&Captures<'_>) -> Result<T, ExtractError>,
    ) -> Self {
        let regex = Regex::new(&pattern).expect("line grammars are valid regexes");
        Self { name, regex, build }
    }

    fn attempt(&self, line: &str) -> Option<Result<T, ExtractError>> {
        self.regex.captures(line).map(|caps| (self.build)(&caps))
    }
}

/// Try `grammars` in order. Returns the first successfully built record; if
/// none succeeds, the first build error, or `NoMatch` when nothing matched.
fn first_success<T>(
    grammars: &[Grammar<T>],
    kind: RecordKind,
    line: &str,
) -> Result<T, ExtractError> {
    let mut first_err = None;
    for grammar in grammars {
        match grammar.attempt(line) {
            Some(Ok(record)) => {
                tracing::debug!(%kind, grammar = grammar.name, "extracted record");
                return Ok(record);
            }
            Some(Err(e)) => {
                tracing::debug!(%kind, grammar = grammar.name, error = %e, "grammar matched but fields were invalid");
                first_err.get_or_insert(e);
            }
            None => {}
        }
    }
    Err(first_err.unwrap_or(ExtractError::NoMatch { kind }))
}

// ---------------------------------------------------------------------------
// Grammar tables
// ---------------------------------------------------------------------------

static GIFT_GRAMMARS: LazyLock<Vec<Grammar<GiftRecord>>> = LazyLock::new(|| {
    let ts = TIMESTAMP_PATTERN;
    vec![
        Grammar::new(
            "goldfire",
            format!(
                r"^(?P<time>{ts}) @\(word:(?P<user>.*?)\) 触发金火时刻！获得 @\(word:(?P<gift>.*?)\) \((?P<beans>\d+)豆\)x(?P<count>\d+)"
            ),
            build_gift,
        ),
        Grammar::new(
            "normal-refine",
            format!(
                r"^(?P<time>{ts}) 恭喜 @\(word:(?P<user>.*?)\) 炼化获得 @\(word:(?P<gift>.*?)\) \((?P<beans>\d+)豆\)x(?P<count>\d+)"
            ),
            build_gift,
        ),
        Grammar::new(
            "rate-refine",
            format!(
                r"^(?P<time>{ts}) 恭喜 @\(word:(?P<user>.*?)\) 触发(?P<rate>\d+\.?\d*)倍炼化，获得 @\(word:(?P<gift>.*?)\) \((?P<beans>\d+)豆\)x(?P<count>\d+)"
            ),
            build_gift,
        ),
    ]
});

static LOTTERY_GRAMMARS: LazyLock<Vec<Grammar<LotteryRecord>>> = LazyLock::new(|| {
    vec![Grammar::new(
        "multiplier",
        format!(
            r"(?P<time>{TIMESTAMP_PATTERN})\s+恭喜@\(word:(?P<user>\w+)\)触发@\(word:(?P<count>\d+)\)倍，获得@\(word:(?P<beans>\d+)\)豆"
        ),
        build_lottery,
    )]
});

static EGG_GRAMMARS: LazyLock<Vec<Grammar<EggRecord>>> = LazyLock::new(|| {
    vec![Grammar::new(
        "gashapon",
        format!(
            r"^(?P<time>{TIMESTAMP_PATTERN}) @\(word:(?P<user>[^)]+)\) 送 @\(word:(?P<receiver>[^)]+)\) @\(word:(?P<count>\d+)\) 个 @\(word:<扭蛋礼物>(?P<gift>[^)]+)\)，"
        ),
        build_egg,
    )]
});

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Extract a refining reward from a gold-fire, normal or rate refine line.
pub fn extract_gift(line: &str) -> Result<GiftRecord, ExtractError> {
    first_success(&GIFT_GRAMMARS, RecordKind::Gift, line)
}

/// Extract a lucky-gift multiplier reward.
///
/// The gift label is derived from the per-unit value `beans / multiple`,
/// truncated to a whole number for the [`tables::LUCKY_GIFT_UNITS`] lookup.
/// A table hit yields the gift name; a miss yields the untruncated per-unit
/// value written as a rate (`"37.5豆/倍"`, `"37.0豆/倍"`).
pub fn extract_lottery(line: &str) -> Result<LotteryRecord, ExtractError> {
    first_success(&LOTTERY_GRAMMARS, RecordKind::Lottery, line)
}

/// Extract a gashapon egg gift. Unknown gift names are valued at 0 beans.
pub fn extract_egg(line: &str) -> Result<EggRecord, ExtractError> {
    first_success(&EGG_GRAMMARS, RecordKind::Egg, line)
}

/// Route a classified line to the extractor for its category.
///
/// Returns `None` for categories that produce no record.
pub fn extract(category: Category, line: &str) -> Option<Result<Record, ExtractError>> {
    match category {
        Category::Artifice => Some(extract_gift(line).map(Record::from)),
        Category::MultiplierReward => Some(extract_lottery(line).map(Record::from)),
        Category::ChameleonLife => Some(extract_egg(line).map(Record::from)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Record construction
// ---------------------------------------------------------------------------

fn build_gift(caps: &Captures<'_>) -> Result<GiftRecord, ExtractError> {
    let multiple = match caps.name("rate") {
        Some(rate) => rate
            .as_str()
            .parse::<f64>()
            .map_err(|_| ExtractError::InvalidNumber {
                field: "rate",
                value: rate.as_str().to_string(),
            })?,
        None => GiftRecord::DEFAULT_MULTIPLE,
    };
    let beans = number(caps, "beans")?;
    let count = number(caps, "count")?;
    GiftRecord::new(
        timestamp(caps)?,
        text(caps, "user"),
        text(caps, "gift"),
        beans,
        count,
        multiple,
    )
    .ok_or_else(|| ExtractError::InvalidNumber {
        field: "total",
        value: format!("{beans}x{count}"),
    })
}

fn build_lottery(caps: &Captures<'_>) -> Result<LotteryRecord, ExtractError> {
    let multiple = number(caps, "count")?;
    let beans = number(caps, "beans")?;
    if multiple == 0 {
        return Err(ExtractError::ZeroMultiplier);
    }
    let gift = match tables::lucky_gift_for_unit(beans / multiple) {
        Some(name) => name.to_string(),
        None => format!("{}豆/倍", rate_label(beans as f64 / multiple as f64)),
    };

    Ok(LotteryRecord {
        time: timestamp(caps)?,
        user: text(caps, "user").trim().to_string(),
        gift,
        multiple,
        beans,
        category: Category::MultiplierReward,
    })
}

/// Decimal form of a per-unit value; whole values keep a trailing `.0`.
fn rate_label(unit: f64) -> String {
    if unit.is_finite() && unit.fract() == 0.0 {
        format!("{unit:.1}")
    } else {
        unit.to_string()
    }
}

fn build_egg(caps: &Captures<'_>) -> Result<EggRecord, ExtractError> {
    let gift = text(caps, "gift").trim().to_string();
    Ok(EggRecord {
        time: timestamp(caps)?,
        user: text(caps, "user").to_string(),
        receiver: text(caps, "receiver").to_string(),
        count: number(caps, "count")?,
        beans: tables::egg_gift_value(&gift),
        gift,
        category: Category::ChameleonLife,
    })
}

fn text<'h>(caps: &Captures<'h>, field: &str) -> &'h str {
    caps.name(field).map(|m| m.as_str()).unwrap_or_default()
}

fn number(caps: &Captures<'_>, field: &'static str) -> Result<u64, ExtractError> {
    let raw = text(caps, field);
    raw.parse().map_err(|_| ExtractError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn timestamp(caps: &Captures<'_>) -> Result<LiveTimestamp, ExtractError> {
    let raw = text(caps, "time");
    LiveTimestamp::parse(raw).ok_or_else(|| ExtractError::InvalidTimestamp(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
