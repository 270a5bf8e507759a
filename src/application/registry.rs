//! Occurrence table keyed by deprecation identifier.
//!
//! The table holds one [`OccurrenceState`] per identifier that has been
//! counted, seeded, or given a temporary-suppression allowance.

use crate::application::ports::{Clock, Storage};
use crate::domain::{occurrence::OccurrenceState, summary::DeprecationSummary};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Table of per-identifier occurrence state.
///
/// Generic over the storage implementation; in production this is
/// `Arc<ShardedStorage<String, OccurrenceState>>`.
#[derive(Clone)]
pub struct OccurrenceRegistry<S>
where
    S: Storage<String, OccurrenceState> + Clone,
{
    storage: S,
    clock: Arc<dyn Clock>,
}

impl<S> OccurrenceRegistry<S>
where
    S: Storage<String, OccurrenceState> + Clone,
{
    /// Create a registry over storage and a clock.
    pub fn new(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Access or create the state for an identifier.
    ///
    /// The callback runs under the identifier's entry lock and receives the
    /// current timestamp.
    pub fn with_state<F, R>(&self, identifier: &str, f: F) -> R
    where
        F: FnOnce(&mut OccurrenceState, Instant) -> R,
    {
        let now = self.clock.now();
        self.storage.with_entry_mut(
            identifier.to_string(),
            OccurrenceState::new,
            |state| f(state, now),
        )
    }

    /// Drop an identifier's entry if it no longer carries a count or allowance.
    pub fn remove_if_vacant(&self, identifier: &str) -> bool {
        self.storage
            .remove_if(&identifier.to_string(), OccurrenceState::is_vacant)
    }

    /// Zero every count in place and drop every allowance.
    ///
    /// Identifiers that only carried an allowance are removed.
    pub fn reset(&self) {
        self.storage.retain(|_, state| {
            state.reset();
            !state.is_vacant()
        });
    }

    /// Snapshot of every known identifier and its count.
    pub fn counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        self.storage.for_each(|identifier, state| {
            if let Some(count) = state.count() {
                counts.insert(identifier.clone(), count);
            }
        });
        counts
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        let mut total = 0u64;
        self.storage.for_each(|_, state| {
            total = total.saturating_add(state.count().unwrap_or(0));
        });
        total
    }

    /// Summaries for identifiers counted at least `min_count` times.
    ///
    /// Sorted by descending count, then identifier.
    pub fn summaries(&self, min_count: u64) -> Vec<DeprecationSummary> {
        let mut summaries = Vec::new();
        self.storage.for_each(|identifier, state| {
            if let Some(summary) = DeprecationSummary::from_state(identifier, state) {
                if summary.count >= min_count {
                    summaries.push(summary);
                }
            }
        });
        summaries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        summaries
    }

    /// Number of stored identifiers, including allowance-only entries.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::storage::ShardedStorage;

    fn registry() -> OccurrenceRegistry<Arc<ShardedStorage<String, OccurrenceState>>> {
        OccurrenceRegistry::new(Arc::new(ShardedStorage::new()), Arc::new(SystemClock::new()))
    }

    #[test]
    fn test_registry_creation() {
        let registry = registry();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert_eq!(registry.total(), 0);
    }

    #[test]
    fn test_with_state_creates_entry() {
        let registry = registry();

        registry.with_state("A", |state, now| state.register_trigger("pkg", now));
        registry.with_state("A", |state, now| state.register_trigger("pkg", now));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.counts().get("A"), Some(&2));
    }

    #[test]
    fn test_allowance_only_entries_are_not_known() {
        let registry = registry();
        registry.with_state("A", |state, _| state.suppress_next(2));

        assert_eq!(registry.len(), 1);
        assert!(registry.counts().is_empty());

        assert!(!registry.remove_if_vacant("A"));
        registry.with_state("A", |state, now| state.register_trigger("pkg", now));
        registry.with_state("A", |state, now| state.register_trigger("pkg", now));
        assert!(registry.remove_if_vacant("A"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reset_preserves_keys() {
        let registry = registry();
        registry.with_state("A", |state, now| state.register_trigger("pkg", now));
        registry.with_state("B", |state, _| state.suppress_next(4));

        registry.reset();

        let counts = registry.counts();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("A"), Some(&0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_total_and_summaries() {
        let registry = registry();
        for _ in 0..3 {
            registry.with_state("A", |state, now| state.register_trigger("pkg", now));
        }
        registry.with_state("B", |state, now| state.register_trigger("other", now));
        registry.with_state("C", |state, _| state.seed());

        assert_eq!(registry.total(), 4);

        let summaries = registry.summaries(1);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].identifier, "A");
        assert_eq!(summaries[0].count, 3);
        assert_eq!(summaries[1].identifier, "B");

        assert_eq!(registry.summaries(2).len(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let registry = Arc::new(registry());
        let mut handles = vec![];

        for i in 0..10 {
            let registry_clone = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let identifier = format!("ID-{}", j % 10);
                    registry_clone.with_state(&identifier, |state, now| {
                        state.register_trigger(&format!("pkg{}", i), now)
                    });
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 10);
        assert_eq!(registry.total(), 1000);
    }
}
