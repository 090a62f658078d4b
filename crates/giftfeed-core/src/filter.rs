//! Filter and aggregation: substring-OR filtering, jackpot highlight and the
//! summary text handed to the display sink.
//!
//! The [`Aggregator`] always recomputes from its full record set; there is no
//! incremental index.
//!
//! # Summary layout
//!
//! ```text
//! 最高 36 倍: Bob 幸运发财 获得 1296 豆     <- one line per jackpot record
//!                                           <- blank separator
//! 10:00:02 [bob]                            <- trailing window, oldest first
//! Bob
//! 抽中 36 倍 幸运发财
//! 获得 1296 豆
//!
//! ```

use std::fmt::Write as _;

use crate::types::Record;

/// Parsed filter text: lower-cased OR-terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    text: String,
    terms: Vec<String>,
}

impl FilterQuery {
    /// Split `text` on `separator` into OR-terms. Terms are trimmed and
    /// lower-cased; empty terms are dropped. No terms means match-all.
    ///
    /// The label keeps the lower-cased text as typed, surrounding spaces
    /// included.
    pub fn parse(text: &str, separator: &str) -> Self {
        let text = text.to_lowercase();
        let terms = text
            .split(separator)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, terms }
    }

    /// Lower-cased filter text as shown in summary entries.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_match_all(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if any displayed column of `record` contains any term,
    /// case-insensitively.
    pub fn matches(&self, record: &Record) -> bool {
        if self.is_match_all() {
            return true;
        }
        record.columns().iter().any(|col| {
            let col = col.to_lowercase();
            self.terms.iter().any(|t| col.contains(t.as_str()))
        })
    }
}

/// Records sharing the maximum multiplier column value. Ties are all kept,
/// in input order.
pub fn jackpots<'r>(records: &[&'r Record]) -> Vec<&'r Record> {
    let Some(max) = records.iter().map(|r| r.multiplier()).max() else {
        return Vec::new();
    };
    records
        .iter()
        .copied()
        .filter(|r| r.multiplier() == max)
        .collect()
}

/// One trailing-window entry of the summary.
pub fn render_entry(record: &Record, filter_text: &str) -> String {
    format!(
        "{} [{}]\n{}\n抽中 {} 倍 {}\n获得 {} 豆\n\n",
        record.time().clock(),
        filter_text,
        record.user(),
        record.multiplier(),
        record.gift(),
        record.beans(),
    )
}

/// Owns the displayed record set and the last emitted summary.
#[derive(Debug)]
pub struct Aggregator {
    records: Vec<Record>,
    filter: FilterQuery,
    separator: String,
    recent_window: usize,
    last_emitted: String,
}

impl Aggregator {
    pub fn new(separator: impl Into<String>, recent_window: usize) -> Self {
        Self {
            records: Vec::new(),
            filter: FilterQuery::default(),
            separator: separator.into(),
            recent_window,
            last_emitted: String::new(),
        }
    }

    /// Replace the displayed record set wholesale.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter = FilterQuery::parse(text, &self.separator);
    }

    pub fn filter(&self) -> &FilterQuery {
        &self.filter
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records matching the current filter, in record order.
    pub fn matching(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| self.filter.matches(r)).collect()
    }

    /// Build the summary text for the current record set and filter.
    ///
    /// Pure with respect to `self`: an unchanged record set and filter always
    /// produce byte-identical text.
    pub fn summary(&self) -> String {
        let matched = self.matching();
        let mut out = String::new();

        let top = jackpots(&matched);
        for r in &top {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "最高 {} 倍: {} {} 获得 {} 豆",
                r.multiplier(),
                r.user(),
                r.gift(),
                r.beans()
            );
        }
        if !top.is_empty() {
            out.push('\n');
        }

        let start = matched.len().saturating_sub(self.recent_window);
        for r in &matched[start..] {
            out.push_str(&render_entry(r, self.filter.text()));
        }
        out
    }

    /// Recompute the summary and return it only if it differs from the last
    /// emitted text. The returned text becomes the new "last emitted".
    pub fn refresh(&mut self) -> Option<String> {
        let summary = self.summary();
        if summary == self.last_emitted {
            tracing::trace!("summary unchanged; emission suppressed");
            return None;
        }
        self.last_emitted.clone_from(&summary);
        tracing::debug!(
            matched = self.matching().len(),
            total = self.records.len(),
            filter = %self.filter.text(),
            "summary changed"
        );
        Some(summary)
    }

    pub fn last_emitted(&self) -> &str {
        &self.last_emitted
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
