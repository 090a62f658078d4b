//! Snapshot: the per-date, per-file record source delivered by sync frames.
//!
//! A sync payload has the shape `{date: {fileLabel: [line, ...]}}`. Parsing
//! keeps the payload's native key order (the first date and first file label
//! are the fallback selection) and analyses every line into records up front,
//! so the consumer only ever swaps a finished [`Snapshot`] in wholesale.

use serde_json::Value;
use thiserror::Error;

use crate::classifier::classify;
use crate::extract::extract;
use crate::types::Record;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("expected an object at {path}")]
    NotAnObject { path: String },
    #[error("expected an array of lines at {path}")]
    NotAnArray { path: String },
    #[error("expected a string line at {path}")]
    NotALine { path: String },
}

/// Lines of one file label, analysed into records.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecords {
    pub label: String,
    pub line_count: usize,
    pub records: Vec<Record>,
}

/// All file labels of one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRecords {
    pub date: String,
    pub files: Vec<FileRecords>,
}

/// An immutable, fully analysed sync snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    dates: Vec<DateRecords>,
}

impl Snapshot {
    /// Parse and analyse a `{date: {fileLabel: [line, ...]}}` payload.
    pub fn from_value(value: &Value) -> Result<Self, SnapshotError> {
        let by_date = value.as_object().ok_or_else(|| SnapshotError::NotAnObject {
            path: "$".to_string(),
        })?;

        let mut dates = Vec::with_capacity(by_date.len());
        for (date, files) in by_date {
            let by_label = files.as_object().ok_or_else(|| SnapshotError::NotAnObject {
                path: format!("$.{date}"),
            })?;
            let mut entries = Vec::with_capacity(by_label.len());
            for (label, lines) in by_label {
                let path = format!("$.{date}.{label}");
                let lines = lines
                    .as_array()
                    .ok_or_else(|| SnapshotError::NotAnArray { path: path.clone() })?;
                let lines = lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        line.as_str().ok_or_else(|| SnapshotError::NotALine {
                            path: format!("{path}[{i}]"),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                entries.push(FileRecords {
                    label: label.clone(),
                    line_count: lines.len(),
                    records: analyze_lines(lines),
                });
            }
            dates.push(DateRecords { date: date.clone(), files: entries });
        }
        Ok(Self { dates })
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.dates.iter().map(|d| d.date.as_str())
    }

    pub fn files(&self, date: &str) -> impl Iterator<Item = &str> {
        self.date(date)
            .into_iter()
            .flat_map(|d| d.files.iter().map(|f| f.label.as_str()))
    }

    pub fn records(&self, date: &str, label: &str) -> Option<&[Record]> {
        self.file(date, label).map(|f| f.records.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.dates
            .iter()
            .flat_map(|d| &d.files)
            .map(|f| f.records.len())
            .sum()
    }

    fn date(&self, date: &str) -> Option<&DateRecords> {
        self.dates.iter().find(|d| d.date == date)
    }

    fn file(&self, date: &str, label: &str) -> Option<&FileRecords> {
        self.date(date)?.files.iter().find(|f| f.label == label)
    }
}

/// Analyse raw lines into records: blank lines are skipped, each remaining
/// line is classified and handed to its category's extractor. Lines that
/// classify to a record-less category or fail extraction produce nothing.
pub fn analyze_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Record> {
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let category = classify(line);
            match extract(category, line)? {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::debug!(%category, error = %e, line, "line produced no record");
                    None
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The caller's current (date, file label) choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub date: Option<String>,
    pub file: Option<String>,
}

impl Selection {
    pub fn new(date: impl Into<String>, file: impl Into<String>) -> Self {
        Self { date: Some(date.into()), file: Some(file.into()) }
    }

    /// Re-anchor this selection onto `snapshot`.
    ///
    /// A date that still exists is kept, otherwise the first date is chosen.
    /// The file label is kept only when its date was kept and the label still
    /// exists under it, otherwise the first label of the resulting date is
    /// chosen. An empty snapshot clears the
    /// selection.
    pub fn reconcile(&self, snapshot: &Snapshot) -> Selection {
        let kept = self.date.as_deref().filter(|d| snapshot.date(d).is_some());
        let Some(date) = kept.or_else(|| snapshot.dates().next()) else {
            return Selection::default();
        };
        let file = kept
            .and(self.file.as_deref())
            .filter(|f| snapshot.file(date, f).is_some())
            .or_else(|| snapshot.files(date).next());
        Selection {
            date: Some(date.to_string()),
            file: file.map(str::to_string),
        }
    }

    /// Select `date`, resetting the file label to that date's first label.
    pub fn with_date(date: &str, snapshot: &Snapshot) -> Selection {
        Selection {
            date: Some(date.to_string()),
            file: None,
        }
        .reconcile(snapshot)
    }

    /// Records currently selected in `snapshot`, if the selection resolves.
    pub fn records<'s>(&self, snapshot: &'s Snapshot) -> Option<&'s [Record]> {
        snapshot.records(self.date.as_deref()?, self.file.as_deref()?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
