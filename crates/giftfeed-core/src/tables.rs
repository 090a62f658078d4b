//! Static gift value tables, compiled into perfect hash maps.

use phf::phf_map;

/// Per-unit bean value of each lucky gift. Lottery rewards are reverse-looked
/// up here by `beans / multiple`.
pub static LUCKY_GIFT_UNITS: phf::Map<&'static str, u64> = phf_map! {
    "幸运围棋" => 4,
    "幸运卡牌" => 12,
    "幸运发财" => 36,
    "幸运面具" => 100,
};

/// Bean value of each gashapon egg gift.
pub static EGG_GIFT_VALUES: phf::Map<&'static str, u64> = phf_map! {
    "神秘人" => 38,
    "插画师" => 198,
    "医生" => 688,
    "拳击手" => 2688,
    "机长" => 5688,
    "超级影帝" => 15888,
    "猴王仙丹" => 8888,
};

/// Name of the lucky gift whose per-unit value is exactly `unit`.
pub fn lucky_gift_for_unit(unit: u64) -> Option<&'static str> {
    LUCKY_GIFT_UNITS
        .entries()
        .find(|(_, value)| **value == unit)
        .map(|(name, _)| *name)
}

/// Bean value of an egg gift; 0 for names not in the table.
pub fn egg_gift_value(name: &str) -> u64 {
    EGG_GIFT_VALUES.get(name).copied().unwrap_or(0)
}
