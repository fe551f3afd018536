//! Shared counters for a counting run.
//!
//! The token total is a lock-free atomic; both per-type maps sit behind a single
//! mutex. Callers only see the three increment operations and the final
//! [`Snapshot`], so the synchronization scheme can change without touching
//! the dispatcher.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct TypeCounts {
    skipped: BTreeMap<String, u64>,
    handled: BTreeMap<String, u64>,
}

/// Thread-safe accumulator fed by every file task.
///
/// All updates are commutative, so the final state does not depend on the
/// order in which tasks finish.
#[derive(Debug, Default)]
pub struct Aggregator {
    total_tokens: AtomicU64,
    counts: Mutex<TypeCounts>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tokens` to the running total. The total never decreases.
    pub fn increment_total(&self, tokens: u64) {
        self.total_tokens.fetch_add(tokens, Ordering::Relaxed);
    }

    /// Count one skipped file under `label`, returning the new count for it.
    pub fn increment_skipped(&self, label: &str) -> u64 {
        let mut counts = self.lock();
        bump(&mut counts.skipped, label)
    }

    /// Count one handled file under `label`, returning the new count for it.
    pub fn increment_handled(&self, label: &str) -> u64 {
        let mut counts = self.lock();
        bump(&mut counts.handled, label)
    }

    /// Final, consistent view of the counters.
    ///
    /// Takes the aggregator by value: a snapshot can only be produced once every
    /// task borrowing it has finished.
    pub fn snapshot(self) -> Snapshot {
        let counts = self.counts.into_inner().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            total_tokens: self.total_tokens.into_inner(),
            skipped_by_type: counts.skipped,
            handled_by_type: counts.handled,
        }
    }

    // A task that panicked mid-update cannot leave a map half-written, so a
    // poisoned lock still holds usable counts.
    fn lock(&self) -> MutexGuard<'_, TypeCounts> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn bump(map: &mut BTreeMap<String, u64>, label: &str) -> u64 {
    if let Some(count) = map.get_mut(label) {
        *count += 1;
        return *count;
    }
    map.insert(label.to_string(), 1);
    1
}

/// Immutable result of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub total_tokens: u64,
    pub skipped_by_type: BTreeMap<String, u64>,
    pub handled_by_type: BTreeMap<String, u64>,
}

impl Snapshot {
    pub fn files_handled(&self) -> u64 {
        self.handled_by_type.values().sum()
    }

    pub fn files_skipped(&self) -> u64 {
        self.skipped_by_type.values().sum()
    }

    /// Files that were read successfully, whether tokenized or skipped.
    pub fn files_read(&self) -> u64 {
        self.files_handled() + self.files_skipped()
    }
}
