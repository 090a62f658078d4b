//! Classifier: maps a raw line to exactly one [`Category`].
//!
//! Patterns are compiled once into an ordered table and never mutated, so
//! [`classify`] can be called from any number of threads without locking.
//! Matching is a substring search; the first category in declaration order
//! whose pattern matches anywhere in the line wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Category;

/// Compiled category patterns, in classification order.
static PATTERNS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    Category::ORDERED
        .iter()
        .filter_map(|&cat| cat.pattern().map(|p| (cat, p)))
        .map(|(cat, p)| {
            (
                cat,
                Regex::new(p).expect("category patterns are valid regexes"),
            )
        })
        .collect()
});

/// Classify one line. Returns [`Category::Unknown`] when no pattern matches.
pub fn classify(line: &str) -> Category {
    let category = PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(cat, _)| *cat)
        .unwrap_or(Category::Unknown);
    tracing::trace!(%category, "classified line");
    category
}
