//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::notice::{CallerFrames, NoticeContext};
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::Location;
use std::time::Instant;

/// Port for structured notice emission.
///
/// Receives the formatted message and its structured context. Failures are
/// the sink's own concern; a panicking sink unwinds into the caller of
/// `trigger`, and the registry holds no lock while calling it.
pub trait NoticeSink: Send + Sync + Debug {
    /// Emit a notice-severity message with its context.
    fn notice(&self, message: &str, context: &NoticeContext);
}

/// Display behavior of a raw warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Shown by default
    Visible,
    /// Emitted, but hidden from default display
    Suppressed,
}

/// Port for the raw warning mechanism.
///
/// Both warning modes build the same message; they differ only in the
/// `visibility` they pass here.
pub trait WarningChannel: Send + Sync + Debug {
    /// Emit a fully formatted warning line.
    fn warn(&self, message: &str, visibility: Visibility);
}

/// Source locations known for one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Where the trigger was written, when recorded by the `deprecation!` macros
    pub origin: Option<&'static Location<'static>>,
    /// Location seen by `#[track_caller]` on the trigger call
    ///
    /// When the function containing the trigger is itself `#[track_caller]`,
    /// this is where that function was called from.
    pub tracked: &'static Location<'static>,
}

impl CallSite {
    /// A call site with only the tracked location.
    pub fn tracked(tracked: &'static Location<'static>) -> Self {
        Self {
            origin: None,
            tracked,
        }
    }

    /// A call site recorded at `origin`.
    pub fn recorded(
        origin: &'static Location<'static>,
        tracked: &'static Location<'static>,
    ) -> Self {
        Self {
            origin: Some(origin),
            tracked,
        }
    }
}

/// Port for resolving where a trigger came from.
///
/// Implementations return the immediate caller and the caller's caller;
/// frames that cannot be resolved are [`Frame::unknown`].
///
/// [`Frame::unknown`]: crate::domain::notice::Frame::unknown
pub trait CallerLocator: Send + Sync + Debug {
    /// Resolve the two frames around a trigger.
    fn locate(&self, call_site: CallSite) -> CallerFrames;
}

/// Port for obtaining current time.
///
/// Used to stamp first and last occurrences for summaries.
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for concurrent key-value storage.
///
/// `with_entry_mut` must hold a per-key lock for the duration of the accessor
/// so read-modify-write sequences on one key are atomic.
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    /// * `factory` - Function to create a new value if the key doesn't exist
    /// * `accessor` - Function that gets mutable access to the value
    ///
    /// # Returns
    /// The result from the accessor function
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    /// Remove the entry for `key` if the predicate holds for its value.
    fn remove_if<F>(&self, key: &K, predicate: F) -> bool
    where
        F: FnOnce(&V) -> bool;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;

    /// Iterate over all entries, providing access to both key and value.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V);

    /// Remove entries for which the predicate returns false.
    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool;
}
