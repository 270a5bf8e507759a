//! Summaries of triggered deprecations.
//!
//! A summary is a point-in-time view of one identifier's occurrences, used
//! for reports at shutdown or on a reporting interval.

use crate::domain::occurrence::OccurrenceState;
use std::time::{Duration, Instant};

/// Occurrence summary for one deprecation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationSummary {
    /// The deprecation identifier
    pub identifier: String,
    /// Package that last reported it
    pub package: String,
    /// Number of counted occurrences
    pub count: u64,
    /// First counted occurrence since the last reset
    pub first_seen: Instant,
    /// Most recent counted occurrence
    pub last_seen: Instant,
    /// Time between first and last occurrence
    pub duration: Duration,
}

impl DeprecationSummary {
    /// Build a summary from an identifier's state.
    ///
    /// Returns `None` for identifiers that have not been counted since the
    /// last reset (unknown, seeded, or reset to zero).
    pub fn from_state(identifier: &str, state: &OccurrenceState) -> Option<Self> {
        let count = state.count().filter(|count| *count > 0)?;
        let first_seen = state.first_seen()?;
        let last_seen = state.last_seen().unwrap_or(first_seen);

        Some(Self {
            identifier: identifier.to_string(),
            package: state.package().unwrap_or_default().to_string(),
            count,
            first_seen,
            last_seen,
            duration: last_seen.saturating_duration_since(first_seen),
        })
    }

    /// Format a one-line human-readable report.
    ///
    /// Returns a string like:
    /// `Deprecation ACME-1 (package acme) triggered 3 times over 1.50s`
    pub fn format_message(&self) -> String {
        let times = if self.count == 1 { "time" } else { "times" };
        format!(
            "Deprecation {} (package {}) triggered {} {} over {:.2}s",
            self.identifier,
            self.package,
            self.count,
            times,
            self.duration.as_secs_f64()
        )
    }
}
