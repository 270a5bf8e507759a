//! Observability metrics for deprecation reporting.
//!
//! Counts what happened to each trigger: emitted, or filtered at one of the
//! four filter steps. Metrics are independent of the occurrence table and
//! survive `disable`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking trigger outcomes.
///
/// All counters are atomics; clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Triggers that produced a warning or sink notice
    emitted: AtomicU64,
    /// Triggers absorbed by a temporary-suppression allowance
    temporarily_suppressed: AtomicU64,
    /// Repeat occurrences skipped by deduplication
    deduplicated: AtomicU64,
    /// Triggers counted while the mode was disabled
    muted: AtomicU64,
    /// Triggers from ignored packages
    ignored: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_emitted(&self) {
        self.inner.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_temporarily_suppressed(&self) {
        self.inner
            .temporarily_suppressed
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_deduplicated(&self) {
        self.inner.deduplicated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_muted(&self) {
        self.inner.muted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ignored(&self) {
        self.inner.ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Triggers that reached an output.
    pub fn emitted(&self) -> u64 {
        self.inner.emitted.load(Ordering::Relaxed)
    }

    /// Triggers absorbed by temporary suppression.
    pub fn temporarily_suppressed(&self) -> u64 {
        self.inner.temporarily_suppressed.load(Ordering::Relaxed)
    }

    /// Repeat occurrences skipped by deduplication.
    pub fn deduplicated(&self) -> u64 {
        self.inner.deduplicated.load(Ordering::Relaxed)
    }

    /// Triggers counted while disabled.
    pub fn muted(&self) -> u64 {
        self.inner.muted.load(Ordering::Relaxed)
    }

    /// Triggers from ignored packages.
    pub fn ignored(&self) -> u64 {
        self.inner.ignored.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            emitted: self.emitted(),
            temporarily_suppressed: self.temporarily_suppressed(),
            deduplicated: self.deduplicated(),
            muted: self.muted(),
            ignored: self.ignored(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.emitted.store(0, Ordering::Relaxed);
        self.inner.temporarily_suppressed.store(0, Ordering::Relaxed);
        self.inner.deduplicated.store(0, Ordering::Relaxed);
        self.inner.muted.store(0, Ordering::Relaxed);
        self.inner.ignored.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Triggers that reached an output
    pub emitted: u64,
    /// Triggers absorbed by temporary suppression
    pub temporarily_suppressed: u64,
    /// Repeat occurrences skipped by deduplication
    pub deduplicated: u64,
    /// Triggers counted while disabled
    pub muted: u64,
    /// Triggers from ignored packages
    pub ignored: u64,
}

impl MetricsSnapshot {
    /// Every trigger seen, whatever its outcome.
    pub fn total_triggers(&self) -> u64 {
        self.emitted
            .saturating_add(self.temporarily_suppressed)
            .saturating_add(self.deduplicated)
            .saturating_add(self.muted)
            .saturating_add(self.ignored)
    }

    /// Triggers that were counted (everything except temporary suppression).
    pub fn counted_triggers(&self) -> u64 {
        self.total_triggers()
            .saturating_sub(self.temporarily_suppressed)
    }

    /// Fraction of triggers that reached an output (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing has been triggered.
    pub fn emission_rate(&self) -> f64 {
        let total = self.total_triggers();
        if total == 0 {
            0.0
        } else {
            self.emitted as f64 / total as f64
        }
    }
}
