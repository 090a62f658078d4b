//! Core types for giftfeed-core.
//!
//! This module defines the fundamental data structures shared across all
//! pipeline layers: the [`Category`] assigned by the classifier, the three
//! immutable record kinds produced by the extractors, and the [`Record`]
//! wrapper the aggregator displays and filters.

use crate::timestamp::LiveTimestamp;

/// Classification tag assigned to a raw live-event line.
///
/// Declaration order is significant: the classifier tests categories in this
/// order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Refining rewards (gold-fire, normal and rate refine).
    Artifice,
    /// Gashapon egg gifts.
    ChameleonLife,
    ADesertDream,
    HolySwordsman,
    PrimaryTreasure,
    AdvancedTreasure,
    GlowingTreasure,
    /// Lucky-gift multiplier rewards.
    MultiplierReward,
    Unknown,
}

impl Category {
    /// Every category that carries a pattern, in classification order.
    pub const ORDERED: [Category; 8] = [
        Category::Artifice,
        Category::ChameleonLife,
        Category::ADesertDream,
        Category::HolySwordsman,
        Category::PrimaryTreasure,
        Category::AdvancedTreasure,
        Category::GlowingTreasure,
        Category::MultiplierReward,
    ];

    /// The unanchored pattern bound to this category, or `None` for
    /// [`Category::Unknown`].
    pub fn pattern(self) -> Option<&'static str> {
        match self {
            Category::Artifice => Some("触发金火时刻|炼化获得|倍炼化"),
            Category::ChameleonLife => Some("插画师|医生|拳击手|机长|超级影帝"),
            Category::ADesertDream => {
                Some("烛光|花灯|敦煌恋歌|走进敦煌|九色神鹿|舞动敦煌|飞天传说|隐藏款")
            }
            Category::HolySwordsman => {
                Some("神圣体魄|黄金手套|黄金战靴|黄金头盔|黄金铠甲|圣剑降临")
            }
            Category::PrimaryTreasure => Some("初级宝藏"),
            Category::AdvancedTreasure => Some("高级宝藏"),
            Category::GlowingTreasure => Some("璀璨宝藏"),
            Category::MultiplierReward => Some("恭喜.*触发.*倍.*获得.*豆"),
            Category::Unknown => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Artifice => write!(f, "artifice"),
            Category::ChameleonLife => write!(f, "chameleon-life"),
            Category::ADesertDream => write!(f, "a-desert-dream"),
            Category::HolySwordsman => write!(f, "holy-swordsman"),
            Category::PrimaryTreasure => write!(f, "primary-treasure"),
            Category::AdvancedTreasure => write!(f, "advanced-treasure"),
            Category::GlowingTreasure => write!(f, "glowing-treasure"),
            Category::MultiplierReward => write!(f, "multiplier-reward"),
            Category::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which extractor produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Gift,
    Lottery,
    Egg,
}

impl RecordKind {
    /// Label shown in the kind column.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Gift => "炼化礼物",
            RecordKind::Lottery => "幸运礼物",
            RecordKind::Egg => "扭蛋礼物",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A refining reward.
///
/// Fields are private so that `total == beans * count` holds for every value
/// that exists; construct through [`GiftRecord::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct GiftRecord {
    time: LiveTimestamp,
    user: String,
    gift: String,
    beans: u64,
    count: u64,
    multiple: f64,
    total: u64,
    category: Category,
}

impl GiftRecord {
    /// Default multiple for grammars that carry no explicit rate.
    pub const DEFAULT_MULTIPLE: f64 = 1.0;

    /// Returns `None` when `beans * count` does not fit in a `u64`.
    pub fn new(
        time: LiveTimestamp,
        user: impl Into<String>,
        gift: impl Into<String>,
        beans: u64,
        count: u64,
        multiple: f64,
    ) -> Option<Self> {
        Some(Self {
            time,
            user: user.into(),
            gift: gift.into(),
            beans,
            count,
            multiple,
            total: beans.checked_mul(count)?,
            category: Category::Artifice,
        })
    }

    pub fn time(&self) -> &LiveTimestamp {
        &self.time
    }
    pub fn user(&self) -> &str {
        &self.user
    }
    pub fn gift(&self) -> &str {
        &self.gift
    }
    pub fn beans(&self) -> u64 {
        self.beans
    }
    pub fn count(&self) -> u64 {
        self.count
    }
    pub fn multiple(&self) -> f64 {
        self.multiple
    }
    pub fn total(&self) -> u64 {
        self.total
    }
    pub fn category(&self) -> Category {
        self.category
    }
}

/// A lucky-gift multiplier reward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryRecord {
    pub time: LiveTimestamp,
    pub user: String,
    /// Gift name from the per-unit table, or the per-unit value annotated as
    /// a rate when no table entry matches exactly.
    pub gift: String,
    pub multiple: u64,
    pub beans: u64,
    pub category: Category,
}

/// A gashapon egg gift sent from one user to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EggRecord {
    pub time: LiveTimestamp,
    pub user: String,
    pub receiver: String,
    pub count: u64,
    pub gift: String,
    /// Per-gift value from the egg table; 0 when the gift is not listed.
    pub beans: u64,
    pub category: Category,
}

/// A displayed record, tagged by the extractor that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Gift(GiftRecord),
    Lottery(LotteryRecord),
    Egg(EggRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Gift(_) => RecordKind::Gift,
            Record::Lottery(_) => RecordKind::Lottery,
            Record::Egg(_) => RecordKind::Egg,
        }
    }

    pub fn time(&self) -> &LiveTimestamp {
        match self {
            Record::Gift(r) => r.time(),
            Record::Lottery(r) => &r.time,
            Record::Egg(r) => &r.time,
        }
    }

    pub fn user(&self) -> &str {
        match self {
            Record::Gift(r) => r.user(),
            Record::Lottery(r) => &r.user,
            Record::Egg(r) => &r.user,
        }
    }

    pub fn gift(&self) -> &str {
        match self {
            Record::Gift(r) => r.gift(),
            Record::Lottery(r) => &r.gift,
            Record::Egg(r) => &r.gift,
        }
    }

    pub fn beans(&self) -> u64 {
        match self {
            Record::Gift(r) => r.beans(),
            Record::Lottery(r) => r.beans,
            Record::Egg(r) => r.beans,
        }
    }

    /// Value of the count/multiplier column: count for gifts and eggs, the
    /// multiple for lottery rewards.
    pub fn multiplier(&self) -> u64 {
        match self {
            Record::Gift(r) => r.count(),
            Record::Lottery(r) => r.multiple,
            Record::Egg(r) => r.count,
        }
    }

    pub fn total(&self) -> u64 {
        match self {
            Record::Gift(r) => r.total(),
            Record::Lottery(r) => r.beans,
            Record::Egg(r) => r.beans,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Record::Gift(r) => r.category(),
            Record::Lottery(r) => r.category,
            Record::Egg(r) => r.category,
        }
    }

    /// The displayed column values in order: time, kind, user, gift, beans,
    /// count/multiplier, total, target.
    pub fn columns(&self) -> [String; 8] {
        let target = match self {
            Record::Egg(r) => format!("赠送给 {}", r.receiver),
            _ => String::new(),
        };
        [
            self.time().as_str().to_string(),
            self.kind().label().to_string(),
            self.user().to_string(),
            self.gift().to_string(),
            self.beans().to_string(),
            self.multiplier().to_string(),
            thousands(self.total()),
            target,
        ]
    }
}

impl From<GiftRecord> for Record {
    fn from(r: GiftRecord) -> Self {
        Record::Gift(r)
    }
}

impl From<LotteryRecord> for Record {
    fn from(r: LotteryRecord) -> Self {
        Record::Lottery(r)
    }
}

impl From<EggRecord> for Record {
    fn from(r: EggRecord) -> Self {
        Record::Egg(r)
    }
}

/// Format an integer with `,` thousands separators.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
