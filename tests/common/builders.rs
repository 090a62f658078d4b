//! Test builders: raw live-room lines and inbound envelope frames.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Raw lines
// ---------------------------------------------------------------------------

/// Timestamp prefix for second `sec` of a fixed evening.
pub fn ts(sec: u32) -> String {
    format!("2024年05月01日 20:{:02}:{:02}.500", sec / 60, sec % 60)
}

/// Fluent builder for refining-reward lines.
///
/// # Example
///
/// ```rust
/// let line = GiftLine::normal("Alice").gift("金币").beans(100).count(5).at(3).build();
/// ```
pub struct GiftLine {
    shape: GiftShape,
    user: String,
    gift: String,
    beans: u64,
    count: u64,
    sec: u32,
}

enum GiftShape {
    Goldfire,
    Normal,
    Rate(String),
}

impl GiftLine {
    pub fn goldfire(user: &str) -> Self {
        Self::with_shape(GiftShape::Goldfire, user)
    }

    pub fn normal(user: &str) -> Self {
        Self::with_shape(GiftShape::Normal, user)
    }

    pub fn rate(user: &str, rate: &str) -> Self {
        Self::with_shape(GiftShape::Rate(rate.to_string()), user)
    }

    fn with_shape(shape: GiftShape, user: &str) -> Self {
        Self {
            shape,
            user: user.to_string(),
            gift: "金币".to_string(),
            beans: 100,
            count: 1,
            sec: 0,
        }
    }

    pub fn gift(mut self, gift: &str) -> Self {
        self.gift = gift.to_string();
        self
    }

    pub fn beans(mut self, beans: u64) -> Self {
        self.beans = beans;
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn at(mut self, sec: u32) -> Self {
        self.sec = sec;
        self
    }

    pub fn build(self) -> String {
        let tail = format!("@(word:{}) ({}豆)x{}", self.gift, self.beans, self.count);
        match self.shape {
            GiftShape::Goldfire => {
                format!("{} @(word:{}) 触发金火时刻！获得 {tail}", ts(self.sec), self.user)
            }
            GiftShape::Normal => format!("{} 恭喜 @(word:{}) 炼化获得 {tail}", ts(self.sec), self.user),
            GiftShape::Rate(rate) => format!(
                "{} 恭喜 @(word:{}) 触发{rate}倍炼化，获得 {tail}",
                ts(self.sec),
                self.user
            ),
        }
    }
}

/// A lucky-gift multiplier line.
pub fn lottery_line(sec: u32, user: &str, multiple: u64, beans: u64) -> String {
    format!(
        "{} 恭喜@(word:{user})触发@(word:{multiple})倍，获得@(word:{beans})豆",
        ts(sec)
    )
}

/// A gashapon egg line.
pub fn egg_line(sec: u32, user: &str, receiver: &str, count: u64, gift: &str) -> String {
    format!(
        "{} @(word:{user}) 送 @(word:{receiver}) @(word:{count}) 个 @(word:<扭蛋礼物>{gift})，",
        ts(sec)
    )
}

// ---------------------------------------------------------------------------
// Envelope frames
// ---------------------------------------------------------------------------

pub fn frame(msg_type: i64, extra: Value) -> String {
    json!({"msgType": msg_type, "msgExtra": extra}).to_string()
}

pub fn exit_frame(text: &str) -> String {
    frame(28, json!(text))
}

pub fn annotated_frame(text: &str) -> String {
    frame(233, json!(text))
}

/// Fluent builder for sync (type 1995) frames.
#[derive(Default)]
pub struct SyncFrame {
    dates: serde_json::Map<String, Value>,
}

impl SyncFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, date: &str, label: &str, lines: &[String]) -> Self {
        let files = self
            .dates
            .entry(date.to_string())
            .or_insert_with(|| json!({}));
        files
            .as_object_mut()
            .expect("date entry is an object")
            .insert(label.to_string(), json!(lines));
        self
    }

    pub fn payload(&self) -> Value {
        Value::Object(self.dates.clone())
    }

    pub fn build(self) -> String {
        frame(
            1995,
            json!({"msgType": "lotteryRecords", "msgExtra": self.payload()}),
        )
    }
}
