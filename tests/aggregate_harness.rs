//! Filter and aggregation integration harness.
//!
//! # What this covers
//!
//! - **OR filtering**: `|`-separated terms, case-insensitive, over every
//!   displayed column.
//! - **Jackpots**: every record at the maximum multiplier is reported.
//! - **Trailing window**: the last three matching records, oldest first.
//! - **Dedup**: an unchanged record set and filter never re-emit.
//!
//! # Running
//!
//! ```sh
//! cargo test --test aggregate_harness
//! ```

mod common;
use common::*;

use giftfeed_core::snapshot::analyze_lines;
use giftfeed_core::{Aggregator, Record};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn aggregator(lines: &[String]) -> Aggregator {
    let mut agg = Aggregator::new("|", 3);
    agg.replace_records(analyze_lines(lines.iter().map(String::as_str)));
    agg
}

fn session_lines() -> Vec<String> {
    vec![
        lottery_line(1, "Alice", 2, 72),
        lottery_line(2, "Bob", 36, 1296),
        lottery_line(3, "Carol", 5, 180),
        lottery_line(4, "bob", 36, 1296),
        lottery_line(5, "Alice", 8, 288),
        lottery_line(6, "Dave", 1, 36),
    ]
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn alice_or_bob() {
    let mut agg = aggregator(&session_lines());
    agg.set_filter("Alice|Bob");
    let users: Vec<&str> = agg.matching().iter().map(|r| r.user()).collect();
    assert_eq!(users, ["Alice", "Bob", "bob", "Alice"]);

    let summary = agg.summary();
    assert_jackpot_users!(summary, ["Bob", "bob"]);
    assert_eq!(window_users(&summary), ["Bob", "bob", "Alice"]);
    assert!(summary.contains("20:00:05.500 [alice|bob]\nAlice\n抽中 8 倍 幸运发财\n获得 288 豆\n\n"));
}

#[test]
fn filter_matches_total_column_with_separators() {
    let lines = vec![GiftLine::normal("Zed").beans(1000).count(12).build()];
    let mut agg = aggregator(&lines);
    agg.set_filter("12,000");
    assert_eq!(agg.matching().len(), 1);
}

#[test]
fn no_match_summary_is_empty() {
    let mut agg = aggregator(&session_lines());
    agg.set_filter("nobody|nothing");
    assert_eq!(agg.summary(), "");
}

#[test]
fn whitespace_filter_is_match_all() {
    let mut agg = aggregator(&session_lines());
    agg.set_filter("   ");
    assert!(agg.filter().is_match_all());
    assert_eq!(agg.matching().len(), 6);
}

// ---------------------------------------------------------------------------
// Window and jackpots
// ---------------------------------------------------------------------------

#[test]
fn fewer_than_window_shows_all() {
    let agg = aggregator(&session_lines()[..2]);
    assert_eq!(window_users(&agg.summary()), ["Alice", "Bob"]);
}

#[test]
fn unfiltered_window_is_last_three() {
    let agg = aggregator(&session_lines());
    let summary = agg.summary();
    assert_jackpot_users!(summary, ["Bob", "bob"]);
    assert_eq!(window_users(&summary), ["bob", "Alice", "Dave"]);
}

#[test]
fn mixed_kinds_rank_by_multiplier_column() {
    let lines = vec![
        GiftLine::normal("Gus").count(50).build(),
        lottery_line(1, "Hal", 36, 1296),
        egg_line(2, "Ian", "主播", 3, "医生"),
    ];
    let agg = aggregator(&lines);
    assert_jackpot_users!(agg.summary(), ["Gus"]);
}

// ---------------------------------------------------------------------------
// Dedup
// ---------------------------------------------------------------------------

#[test]
fn refresh_is_idempotent() {
    let mut agg = aggregator(&session_lines());
    let first = agg.refresh().expect("first emission");
    assert_eq!(agg.refresh(), None);

    agg.set_filter("ALICE|BOB");
    let second = agg.refresh().expect("filter changed");
    assert_ne!(first, second);

    agg.set_filter("alice|bob");
    assert_eq!(agg.refresh(), None);

    agg.replace_records(analyze_lines(session_lines().iter().map(String::as_str)));
    assert_eq!(agg.refresh(), None);
}

proptest! {
    #[test]
    fn matching_agrees_with_column_scan(filter in "[a-zA-Z| ]{0,12}") {
        let mut agg = aggregator(&session_lines());
        agg.set_filter(&filter);

        let lowered = filter.to_lowercase();
        let terms: Vec<&str> = lowered.split('|').map(str::trim).filter(|t| !t.is_empty()).collect();
        let expected: Vec<&Record> = agg
            .records()
            .iter()
            .filter(|r| {
                terms.is_empty()
                    || r.columns()
                        .iter()
                        .any(|col| terms.iter().any(|t| col.to_lowercase().contains(t)))
            })
            .collect();
        prop_assert_eq!(agg.matching(), expected);
    }

    #[test]
    fn summary_is_deterministic(filter in "[a-zA-Z|]{0,12}") {
        let mut a = aggregator(&session_lines());
        let mut b = aggregator(&session_lines());
        a.set_filter(&filter);
        b.set_filter(&filter);
        prop_assert_eq!(a.summary(), b.summary());
    }
}
