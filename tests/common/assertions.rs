//! Domain-specific assertion macros for giftfeed harnesses.
//!
//! These add context-rich failure messages that make it clear which line or
//! summary broke and how.

/// Assert that every line in a corpus classifies to `category`.
///
/// ```rust
/// assert_all_classify!(CORPUS_LOTTERY, Category::MultiplierReward);
/// ```
#[macro_export]
macro_rules! assert_all_classify {
    ($corpus:expr, $category:expr) => {{
        for line in $corpus.iter() {
            let got = giftfeed_core::classify(line);
            if got != $category {
                panic!(
                    "assert_all_classify! failed:\n  line:     {:?}\n  expected: {}\n  actual:   {}",
                    line, $category, got
                );
            }
        }
    }};
}

/// Assert that a summary's jackpot block names exactly these users, in order.
///
/// ```rust
/// assert_jackpot_users!(summary, ["Bob", "Carol"]);
/// ```
#[macro_export]
macro_rules! assert_jackpot_users {
    ($summary:expr, [$($user:expr),* $(,)?]) => {{
        let summary: &str = &$summary;
        let expected: Vec<&str> = vec![$($user),*];
        let actual: Vec<&str> = summary
            .lines()
            .take_while(|l| l.starts_with("最高 "))
            .filter_map(|l| l.split_once(": ").map(|(_, rest)| rest))
            .filter_map(|rest| rest.split(' ').next())
            .collect();
        if actual != expected {
            panic!(
                "assert_jackpot_users! failed:\n  expected: {:?}\n  actual:   {:?}\n  summary:\n{}",
                expected, actual, summary
            );
        }
    }};
}

/// Users of the trailing-window entries in a summary, oldest first.
pub fn window_users(summary: &str) -> Vec<String> {
    summary
        .split("\n\n")
        .filter_map(|block| {
            let mut lines = block.lines();
            let header = lines.next()?;
            // Window entries open with `HH:MM:SS.f [filter]`.
            if !header.contains(" [") {
                return None;
            }
            lines.next().map(str::to_string)
        })
        .collect()
}
