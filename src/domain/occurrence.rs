//! Per-identifier occurrence state.
//!
//! Each deprecation identifier owns one [`OccurrenceState`] holding both its
//! occurrence count and its temporary-suppression allowance, so the
//! suppress-or-count decision for one trigger happens under a single lock.

use std::time::Instant;

/// Result of registering one trigger against an identifier's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOutcome {
    /// Absorbed by a temporary-suppression allowance; not counted.
    Suppressed {
        /// The allowance reached zero with this trigger
        exhausted: bool,
    },
    /// Counted; `count` is the post-increment value.
    Counted {
        /// Occurrences recorded so far, including this one
        count: u64,
    },
}

impl CountOutcome {
    /// Whether this trigger is the first occurrence since the last reset.
    pub fn is_first_occurrence(&self) -> bool {
        matches!(self, CountOutcome::Counted { count: 1 })
    }
}

/// Counting and suppression state for one identifier.
///
/// `count` is `None` until the identifier is first counted or seeded; an
/// identifier with a count is "known" and appears in snapshots. `allowance`
/// is the number of upcoming triggers to absorb silently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceState {
    count: Option<u64>,
    allowance: u32,
    package: Option<String>,
    first_seen: Option<Instant>,
    last_seen: Option<Instant>,
}

impl OccurrenceState {
    /// Create an empty state: unknown identifier, no allowance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one trigger.
    ///
    /// A positive allowance absorbs the trigger and is decremented; otherwise
    /// the count is incremented and the reporting package remembered.
    pub fn register_trigger(&mut self, package: &str, now: Instant) -> CountOutcome {
        if self.allowance > 0 {
            self.allowance -= 1;
            return CountOutcome::Suppressed {
                exhausted: self.allowance == 0,
            };
        }

        let count = self.count.unwrap_or(0).saturating_add(1);
        self.count = Some(count);
        if self.package.as_deref() != Some(package) {
            self.package = Some(package.to_owned());
        }
        self.first_seen.get_or_insert(now);
        self.last_seen = Some(now);

        CountOutcome::Counted { count }
    }

    /// Replace the temporary-suppression allowance.
    pub fn suppress_next(&mut self, times: u32) {
        self.allowance = times;
    }

    /// Mark the identifier known with a zero count.
    pub fn seed(&mut self) {
        self.count = Some(0);
        self.first_seen = None;
        self.last_seen = None;
    }

    /// Zero the count in place and drop any allowance.
    pub fn reset(&mut self) {
        if self.count.is_some() {
            self.count = Some(0);
        }
        self.allowance = 0;
        self.first_seen = None;
        self.last_seen = None;
    }

    /// The occurrence count, if the identifier is known.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Remaining temporary-suppression allowance.
    pub fn allowance(&self) -> u32 {
        self.allowance
    }

    /// Package that last reported this identifier.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// When this identifier was first counted since the last reset.
    pub fn first_seen(&self) -> Option<Instant> {
        self.first_seen
    }

    /// When this identifier was last counted.
    pub fn last_seen(&self) -> Option<Instant> {
        self.last_seen
    }

    /// Whether the state carries neither a count nor an allowance.
    pub fn is_vacant(&self) -> bool {
        self.count.is_none() && self.allowance == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_trigger_counts() {
        let mut state = OccurrenceState::new();
        let now = Instant::now();

        let outcome = state.register_trigger("acme", now);
        assert_eq!(outcome, CountOutcome::Counted { count: 1 });
        assert!(outcome.is_first_occurrence());
        assert_eq!(state.count(), Some(1));
        assert_eq!(state.package(), Some("acme"));
        assert_eq!(state.first_seen(), Some(now));
    }

    #[test]
    fn test_allowance_absorbs_triggers() {
        let mut state = OccurrenceState::new();
        let now = Instant::now();
        state.suppress_next(2);

        assert_eq!(
            state.register_trigger("acme", now),
            CountOutcome::Suppressed { exhausted: false }
        );
        assert_eq!(
            state.register_trigger("acme", now),
            CountOutcome::Suppressed { exhausted: true }
        );
        assert_eq!(state.count(), None);
        assert!(state.is_vacant());

        assert_eq!(
            state.register_trigger("acme", now),
            CountOutcome::Counted { count: 1 }
        );
    }

    #[test]
    fn test_suppress_next_replaces_allowance() {
        let mut state = OccurrenceState::new();
        state.suppress_next(5);
        state.suppress_next(1);
        assert_eq!(state.allowance(), 1);
    }

    #[test]
    fn test_seed_resets_count() {
        let mut state = OccurrenceState::new();
        let now = Instant::now();
        state.register_trigger("acme", now);
        state.register_trigger("acme", now);

        state.seed();
        assert_eq!(state.count(), Some(0));
        assert_eq!(state.first_seen(), None);

        // A seeded identifier counts its next trigger as the first occurrence
        assert!(state.register_trigger("acme", now).is_first_occurrence());
    }

    #[test]
    fn test_reset_keeps_known_identifiers() {
        let mut state = OccurrenceState::new();
        let now = Instant::now();
        state.register_trigger("acme", now);
        state.suppress_next(3);

        state.reset();
        assert_eq!(state.count(), Some(0));
        assert_eq!(state.allowance(), 0);
        assert!(!state.is_vacant());
    }

    #[test]
    fn test_reset_of_suppression_only_state_is_vacant() {
        let mut state = OccurrenceState::new();
        state.suppress_next(3);

        state.reset();
        assert!(state.is_vacant());
    }

    #[test]
    fn test_package_tracks_latest_reporter() {
        let mut state = OccurrenceState::new();
        let now = Instant::now();
        state.register_trigger("acme", now);
        state.register_trigger("acme-compat", now);
        assert_eq!(state.package(), Some("acme-compat"));
    }
}
