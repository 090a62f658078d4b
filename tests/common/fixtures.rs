//! Static line corpora used across harnesses.
//!
//! One corpus per category marker, plus lines that classify but fail
//! extraction. The HIGH_VOLUME generator mixes all record kinds.

use crate::common::builders::{egg_line, lottery_line, GiftLine};

/// Lines that classify as Artifice and extract as gift records.
pub const CORPUS_ARTIFICE: &[&str] = &[
    "2024年05月01日 20:00:01 @(word:Alice) 触发金火时刻！获得 @(word:金币) (100豆)x5",
    "2024年05月01日 20:00:02.125 恭喜 @(word:Bob) 炼化获得 @(word:紫晶) (520豆)x2",
    "2024年05月01日 20:00:03 恭喜 @(word:Carol) 触发2.5倍炼化，获得 @(word:金币) (100豆)x3",
];

/// Lines that classify as MultiplierReward and extract as lottery records.
pub const CORPUS_LOTTERY: &[&str] = &[
    "2024年05月01日 20:01:00 恭喜@(word:Dave)触发@(word:36)倍，获得@(word:1296)豆",
    "2024年05月01日 20:01:01 恭喜@(word:Erin)触发@(word:10)倍，获得@(word:1000)豆",
    "2024年05月01日 20:01:02 恭喜@(word:Frank)触发@(word:2)倍，获得@(word:75)豆",
];

/// Lines that classify as ChameleonLife and extract as egg records.
pub const CORPUS_EGG: &[&str] = &[
    "2024年05月01日 20:02:00 @(word:Gina) 送 @(word:主播) @(word:2) 个 @(word:<扭蛋礼物>医生)，",
    "2024年05月01日 20:02:01 @(word:Hank) 送 @(word:主播) @(word:1) 个 @(word:<扭蛋礼物>超级影帝)，",
];

/// Lines that classify as record-less categories.
pub const CORPUS_RECORDLESS: &[&str] = &[
    "2024年05月01日 20:03:00 @(word:Ivy) 点亮了 走进敦煌",
    "2024年05月01日 20:03:01 @(word:Jack) 获得 黄金手套",
    "2024年05月01日 20:03:02 @(word:Kim) 开启 初级宝藏",
    "2024年05月01日 20:03:03 @(word:Lee) 开启 高级宝藏",
    "2024年05月01日 20:03:04 @(word:Max) 开启 璀璨宝藏",
];

/// Lines that match no marker at all.
pub const CORPUS_UNKNOWN: &[&str] = &[
    "",
    "2024年05月01日 20:04:00 @(word:Ned) 进入了直播间",
    "plain chat text",
];

/// `n` synthetic lines cycling through gift, lottery and egg shapes.
pub fn corpus_high_volume(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let sec = (i % 3600) as u32;
            let user = format!("user{}", i % 97);
            match i % 3 {
                0 => GiftLine::normal(&user).beans(100).count((i % 9 + 1) as u64).at(sec).build(),
                1 => lottery_line(sec, &user, (i % 50 + 1) as u64, 36 * (i % 50 + 1) as u64),
                _ => egg_line(sec, &user, "主播", 1, "机长"),
            }
        })
        .collect()
}
