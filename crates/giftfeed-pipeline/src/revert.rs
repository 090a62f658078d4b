//! Single-owner revert timer for the exit-notice field.
//!
//! Showing a notice arms one timer that restores the default text after the
//! configured delay. A newer notice replaces the pending timer: the old one
//! is aborted and its generation invalidated under the same lock that
//! installs the new one, so at most one revert is ever pending and a stale
//! timer that already woke up cannot write.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::display::DisplayHandle;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct RevertTimer {
    display: DisplayHandle,
    field: Arc<str>,
    default_text: Arc<str>,
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl RevertTimer {
    pub fn new(
        display: DisplayHandle,
        field: impl Into<Arc<str>>,
        default_text: impl Into<Arc<str>>,
        delay: Duration,
    ) -> Self {
        Self {
            display,
            field: field.into(),
            default_text: default_text.into(),
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Show `notice` and (re)arm the revert. Must be called from within a
    /// tokio runtime.
    pub fn show(&self, notice: &str) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.pending.take() {
            previous.abort();
            tracing::debug!(generation = slot.generation, "pending revert replaced");
        }
        self.display.set_text(&self.field, notice);

        slot.generation += 1;
        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let display = self.display.clone();
        let field = Arc::clone(&self.field);
        let default_text = Arc::clone(&self.default_text);
        let delay = self.delay;

        slot.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.generation != generation {
                return;
            }
            display.set_text(&field, &default_text);
            slot.pending = None;
            tracing::debug!(generation, "exit notice reverted");
        }));
    }

    /// Drop any pending revert without writing the default text. Returns
    /// whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        match slot.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .is_some()
    }
}
