//! The single consumer: owns every piece of mutable aggregation state and
//! applies [`Update`]s strictly in dequeue order.
//!
//! The consumer wakes on a fixed tick and drains what is queued at that
//! moment without blocking. After each update that can change the displayed
//! record set or filter, it re-runs aggregation and hands the summary to the
//! display only when the text differs from the last emission.

use std::time::Duration;

use giftfeed_core::config::Config;
use giftfeed_core::{Aggregator, MessageLog, MessageSource, Selection, Snapshot};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::dispatch::Update;
use crate::display::DisplayHandle;

/// Consumer-owned state.
#[derive(Debug)]
pub struct Session {
    snapshot: Snapshot,
    selection: Selection,
    aggregator: Aggregator,
    log: MessageLog,
    display: DisplayHandle,
    summary_field: String,
    applied: u64,
}

impl Session {
    pub fn new(config: &Config, display: DisplayHandle) -> Self {
        let mut aggregator = Aggregator::new(&config.filter.separator, config.display.recent_window);
        aggregator.set_filter(&config.filter.initial);
        Self {
            snapshot: Snapshot::default(),
            selection: Selection::default(),
            aggregator,
            log: MessageLog::new(config.log.capacity),
            display,
            summary_field: config.display.summary_field.clone(),
            applied: 0,
        }
    }

    pub fn apply(&mut self, update: Update) {
        self.applied += 1;
        match update {
            Update::Message { source, text } => {
                tracing::info!(%source, %text, "message");
                self.log.push(source, text);
            }
            Update::Snapshot(snapshot) => {
                self.log.push(
                    MessageSource::Sync,
                    format!(
                        "收到同步数据: {} 天, {} 条记录",
                        snapshot.dates().count(),
                        snapshot.record_count()
                    ),
                );
                self.snapshot = snapshot;
                self.selection = self.selection.reconcile(&self.snapshot);
                tracing::info!(
                    date = ?self.selection.date,
                    file = ?self.selection.file,
                    "snapshot applied"
                );
                self.reload_records();
            }
            Update::SetFilter(text) => {
                self.aggregator.set_filter(&text);
                self.log.push(MessageSource::System, format!("filter: {}", self.aggregator.filter().text()));
                self.emit();
            }
            Update::SelectDate(date) => {
                if !self.snapshot.dates().any(|d| d == date) {
                    tracing::warn!(%date, "unknown date; selection unchanged");
                    return;
                }
                self.selection = Selection::with_date(&date, &self.snapshot);
                self.log.push(MessageSource::System, format!("date: {date}"));
                self.reload_records();
            }
            Update::SelectFile(file) => {
                let Some(date) = self.selection.date.clone() else {
                    tracing::warn!(%file, "no date selected; selection unchanged");
                    return;
                };
                if self.snapshot.records(&date, &file).is_none() {
                    tracing::warn!(%date, %file, "unknown file; selection unchanged");
                    return;
                }
                self.selection.file = Some(file.clone());
                self.log.push(MessageSource::System, format!("file: {file}"));
                self.reload_records();
            }
        }
    }

    /// Re-derive the displayed record set from the current selection.
    fn reload_records(&mut self) {
        let records = self
            .selection
            .records(&self.snapshot)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        self.aggregator.replace_records(records);
        self.emit();
    }

    fn emit(&mut self) {
        if let Some(summary) = self.aggregator.refresh() {
            self.display.set_text(&self.summary_field, &summary);
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Number of updates applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

enum Drain {
    Open(usize),
    Closed,
}

/// Apply at most what is queued right now.
fn drain(session: &mut Session, rx: &mut mpsc::UnboundedReceiver<Update>) -> Drain {
    let budget = rx.len().max(1);
    let mut applied = 0;
    while applied < budget {
        match rx.try_recv() {
            Ok(update) => {
                session.apply(update);
                applied += 1;
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return Drain::Closed,
        }
    }
    Drain::Open(applied)
}

/// Run the consumer loop until every producer is gone or `cancel` fires.
/// Whatever is still queued on cancellation is applied before returning.
pub async fn run_consumer(
    mut session: Session,
    mut rx: mpsc::UnboundedReceiver<Update>,
    tick: Duration,
    cancel: CancellationToken,
) -> Session {
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                while let Drain::Open(n) = drain(&mut session, &mut rx) {
                    if n == 0 {
                        break;
                    }
                }
                tracing::debug!(applied = session.applied(), "consumer cancelled");
                break;
            }
            _ = ticker.tick() => match drain(&mut session, &mut rx) {
                Drain::Open(n) => {
                    if n > 0 {
                        tracing::trace!(applied = n, "tick drained");
                    }
                }
                Drain::Closed => {
                    tracing::debug!(applied = session.applied(), "all producers gone; consumer stopping");
                    break;
                }
            },
        }
    }
    session
}
