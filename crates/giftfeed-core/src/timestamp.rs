//! Live-room timestamps: `YYYY年MM月DD日 HH:MM:SS[.fraction]`.

use chrono::NaiveDateTime;

const FORMAT: &str = "%Y年%m月%d日 %H:%M:%S%.f";

/// Regex fragment matching one timestamp. Shared by every line grammar.
pub const TIMESTAMP_PATTERN: &str = r"\d{4}年\d{2}月\d{2}日 \d{2}:\d{2}:\d{2}(?:\.\d+)?";

/// A timestamp as it appeared on the line, together with its parsed value.
///
/// The raw text is what gets displayed and filtered on; the parsed value
/// rejects impossible dates such as `2024年13月40日`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiveTimestamp {
    raw: String,
    at: NaiveDateTime,
}

impl LiveTimestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        let at = NaiveDateTime::parse_from_str(raw, FORMAT).ok()?;
        Some(Self { raw: raw.to_string(), at })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    /// Time-of-day part exactly as written, fraction included.
    pub fn clock(&self) -> &str {
        self.raw
            .split_once(' ')
            .map(|(_, clock)| clock)
            .unwrap_or(&self.raw)
    }
}

impl std::fmt::Display for LiveTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
