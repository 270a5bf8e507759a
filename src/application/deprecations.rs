//! The deprecation registry.
//!
//! [`Deprecations`] decides, for every trigger, whether to count, suppress,
//! or count and emit. The checks run in a fixed order:
//!
//! 1. temporary suppression (absorbs the trigger, no count)
//! 2. count
//! 3. deduplication (repeat occurrences stop here)
//! 4. mode (disabled stops here)
//! 5. ignored package
//! 6. format and emit
//!
//! Steps 1-3 run under the identifier's entry lock. Emission runs after every
//! lock has been released.

use crate::application::metrics::Metrics;
use crate::application::mode::Mode;
use crate::application::ports::{
    CallSite, CallerLocator, NoticeSink, Storage, Visibility, WarningChannel,
};
use crate::application::registry::OccurrenceRegistry;
use crate::domain::mode::ModeKind;
use crate::domain::notice::{CallerFrames, Notice};
use crate::domain::occurrence::{CountOutcome, OccurrenceState};
use crate::domain::summary::DeprecationSummary;
use crate::infrastructure::storage::ShardedStorage;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const LOG_TARGET: &str = "tracing_deprecations";

/// Process-wide deprecation registry.
///
/// Library code reports deprecations with [`trigger`](Self::trigger) (or the
/// [`deprecation!`](crate::deprecation) macro); the embedding application
/// chooses how they surface with the `enable_*` methods and filters them with
/// the `ignore_*` methods.
///
/// Every operation is total and callable in any order. Counting happens in
/// every mode, so the query methods work even when nothing is emitted.
pub struct Deprecations<S = Arc<ShardedStorage<String, OccurrenceState>>>
where
    S: Storage<String, OccurrenceState> + Clone,
{
    occurrences: OccurrenceRegistry<S>,
    mode: RwLock<Mode>,
    ignored_packages: RwLock<BTreeSet<String>>,
    deduplicate: AtomicBool,
    warnings: Arc<dyn WarningChannel>,
    locator: Arc<dyn CallerLocator>,
    metrics: Metrics,
}

impl<S> Deprecations<S>
where
    S: Storage<String, OccurrenceState> + Clone,
{
    /// Assemble a registry from its parts.
    ///
    /// Most callers want [`Deprecations::builder`] instead.
    pub fn from_parts(
        occurrences: OccurrenceRegistry<S>,
        warnings: Arc<dyn WarningChannel>,
        locator: Arc<dyn CallerLocator>,
    ) -> Self {
        Self {
            occurrences,
            mode: RwLock::new(Mode::Disabled),
            ignored_packages: RwLock::new(BTreeSet::new()),
            deduplicate: AtomicBool::new(true),
            warnings,
            locator,
            metrics: Metrics::new(),
        }
    }

    /// Report a deprecation.
    ///
    /// `message` is only formatted when the trigger is emitted. The caller
    /// location is taken from `#[track_caller]`, so marking the deprecated
    /// function `#[track_caller]` as well attributes the notice to its caller.
    ///
    /// # Example
    ///
    /// ```
    /// use tracing_deprecations::Deprecations;
    ///
    /// let deprecations = Deprecations::new();
    /// deprecations.trigger("acme", "ACME-1", format_args!("Use {} instead", "new_fn"));
    ///
    /// // Disabled by default, but still counted
    /// assert_eq!(deprecations.triggered_deprecations()["ACME-1"], 1);
    /// ```
    #[track_caller]
    pub fn trigger(&self, package: &str, identifier: &str, message: fmt::Arguments<'_>) {
        let call_site = CallSite::tracked(Location::caller());
        self.process(package, identifier, message, call_site, None);
    }

    /// Report a deprecation written at `origin`.
    ///
    /// `origin` becomes the immediate frame. If the enclosing function is
    /// `#[track_caller]`, its caller is reported as the outer frame. The
    /// [`deprecation!`](crate::deprecation) macro calls this with its own
    /// location.
    #[track_caller]
    pub fn trigger_at(
        &self,
        origin: &'static Location<'static>,
        package: &str,
        identifier: &str,
        message: fmt::Arguments<'_>,
    ) {
        let call_site = CallSite::recorded(origin, Location::caller());
        self.process(package, identifier, message, call_site, None);
    }

    /// Report a deprecation unless it comes from inside the reporting package.
    ///
    /// When both caller frames resolve and the outer frame lives in the same
    /// package as the immediate caller, the trigger is dropped entirely: not
    /// counted, not emitted. Calls from a `tests` directory, and calls whose
    /// frames cannot be resolved, behave like [`trigger`](Self::trigger).
    ///
    /// Without a recorded origin the default [`TrackCallerLocator`] cannot
    /// resolve the outer frame, so this filters nothing unless a
    /// [`CallerLocator`] providing both frames is configured. Use
    /// [`deprecation_from_outside!`](crate::deprecation_from_outside) inside a
    /// `#[track_caller]` function instead.
    ///
    /// [`TrackCallerLocator`]: crate::infrastructure::locator::TrackCallerLocator
    #[track_caller]
    pub fn trigger_if_called_from_outside(
        &self,
        package: &str,
        identifier: &str,
        message: fmt::Arguments<'_>,
    ) {
        let call_site = CallSite::tracked(Location::caller());
        self.process_if_outside(package, identifier, message, call_site);
    }

    /// Like [`trigger_if_called_from_outside`](Self::trigger_if_called_from_outside)
    /// for a deprecation written at `origin`.
    #[track_caller]
    pub fn trigger_if_called_from_outside_at(
        &self,
        origin: &'static Location<'static>,
        package: &str,
        identifier: &str,
        message: fmt::Arguments<'_>,
    ) {
        let call_site = CallSite::recorded(origin, Location::caller());
        self.process_if_outside(package, identifier, message, call_site);
    }

    fn process_if_outside(
        &self,
        package: &str,
        identifier: &str,
        message: fmt::Arguments<'_>,
        call_site: CallSite,
    ) {
        let frames = self.locator.locate(call_site);

        if frames.caller.is_known()
            && frames.outer.is_known()
            && !frames.outer.is_in_tests_dir()
            && frames.is_internal_call()
        {
            tracing::trace!(
                target: LOG_TARGET,
                package,
                identifier,
                "deprecation triggered from inside its own package"
            );
            return;
        }

        self.process(package, identifier, message, call_site, Some(frames));
    }

    fn process(
        &self,
        package: &str,
        identifier: &str,
        message: fmt::Arguments<'_>,
        call_site: CallSite,
        frames: Option<CallerFrames>,
    ) {
        let deduplicate = self.deduplicate.load(Ordering::SeqCst);
        let outcome = self
            .occurrences
            .with_state(identifier, |state, now| state.register_trigger(package, now));

        match outcome {
            CountOutcome::Suppressed { exhausted } => {
                if exhausted {
                    self.occurrences.remove_if_vacant(identifier);
                }
                self.metrics.record_temporarily_suppressed();
                return;
            }
            CountOutcome::Counted { .. } if deduplicate && !outcome.is_first_occurrence() => {
                self.metrics.record_deduplicated();
                return;
            }
            CountOutcome::Counted { .. } => {}
        }

        let mode = self.read_mode().clone();
        if !mode.is_enabled() {
            self.metrics.record_muted();
            return;
        }

        if self.is_package_ignored(package) {
            self.metrics.record_ignored();
            return;
        }

        let frames = frames.unwrap_or_else(|| self.locator.locate(call_site));
        let notice = Notice::new(package, identifier, message.to_string(), frames);
        self.metrics.record_emitted();

        match mode {
            Mode::Disabled => {}
            Mode::WarnEmit => self.emit_warning(&notice, Visibility::Visible),
            Mode::WarnSuppressed => self.emit_warning(&notice, Visibility::Suppressed),
            Mode::StructuredLog(sink) => Self::emit_notice(sink.as_ref(), &notice),
        }
    }

    fn emit_warning(&self, notice: &Notice, visibility: Visibility) {
        self.warnings.warn(&notice.warning_text(), visibility);
    }

    fn emit_notice(sink: &dyn NoticeSink, notice: &Notice) {
        sink.notice(&notice.message, &notice.context());
    }

    /// Emit deprecations as always-visible warnings.
    pub fn enable_with_warnings(&self) {
        self.set_mode(Mode::WarnEmit);
    }

    /// Emit deprecations as warnings hidden from default display.
    pub fn enable_with_suppressed_warnings(&self) {
        self.set_mode(Mode::WarnSuppressed);
    }

    /// Route deprecations to a structured sink.
    pub fn enable_with_sink(&self, sink: Arc<dyn NoticeSink>) {
        self.set_mode(Mode::StructuredLog(sink));
    }

    /// Replace the active mode.
    ///
    /// Unlike [`disable`](Self::disable), setting [`Mode::Disabled`] here
    /// leaves counts, allowances and deduplication untouched.
    pub fn set_mode(&self, mode: Mode) {
        let kind = mode.kind();
        *self.write_mode() = mode;
        tracing::debug!(target: LOG_TARGET, mode = %kind, "deprecation mode changed");
    }

    /// Stop emitting and reset tracking state.
    ///
    /// Zeroes every count in place (identifiers stay known), drops the sink,
    /// clears all temporary-suppression allowances and re-enables
    /// deduplication. Ignored packages are kept.
    pub fn disable(&self) {
        let mut mode = self.write_mode();
        *mode = Mode::Disabled;
        self.deduplicate.store(true, Ordering::SeqCst);
        self.occurrences.reset();
        drop(mode);
        tracing::debug!(target: LOG_TARGET, "deprecations disabled and reset");
    }

    /// The active mode.
    pub fn mode(&self) -> Mode {
        self.read_mode().clone()
    }

    /// The active mode's discriminant.
    pub fn mode_kind(&self) -> ModeKind {
        self.read_mode().kind()
    }

    /// Never emit deprecations reported by `package`.
    ///
    /// Its deprecations are still counted. There is no way to undo this.
    pub fn ignore_package(&self, package: impl Into<String>) {
        let package = package.into();
        tracing::debug!(target: LOG_TARGET, package = %package, "ignoring deprecations of package");
        self.ignored_packages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(package);
    }

    /// Whether `package` has been ignored.
    pub fn is_package_ignored(&self, package: &str) -> bool {
        self.ignored_packages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(package)
    }

    /// The ignored packages, sorted.
    pub fn ignored_packages(&self) -> Vec<String> {
        self.ignored_packages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Mark identifiers as known with a zero count.
    ///
    /// Existing counts are reset to zero, so with deduplication enabled the
    /// next trigger of each identifier is emitted again.
    pub fn ignore_deprecations<I>(&self, identifiers: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for identifier in identifiers {
            self.occurrences
                .with_state(identifier.as_ref(), |state, _now| state.seed());
        }
    }

    /// Silently absorb the next `times` triggers of `identifier`.
    ///
    /// Absorbed triggers are neither counted nor emitted. Replaces any
    /// previous allowance; `times = 0` removes it.
    pub fn ignore_deprecation_temporarily(&self, identifier: &str, times: u32) {
        self.occurrences
            .with_state(identifier, |state, _now| state.suppress_next(times));
        if times == 0 {
            self.occurrences.remove_if_vacant(identifier);
        }
    }

    /// Silently absorb the next trigger of `identifier`.
    pub fn ignore_deprecation_once(&self, identifier: &str) {
        self.ignore_deprecation_temporarily(identifier, 1);
    }

    /// Emit every occurrence, not only the first, until [`disable`](Self::disable).
    pub fn without_deduplication(&self) {
        self.deduplicate.store(false, Ordering::SeqCst);
    }

    /// Whether only first occurrences are emitted.
    pub fn is_deduplicating(&self) -> bool {
        self.deduplicate.load(Ordering::SeqCst)
    }

    /// Total counted occurrences across all known identifiers.
    pub fn unique_triggered_deprecations_count(&self) -> u64 {
        self.occurrences.total()
    }

    /// Snapshot of every known identifier and its count.
    pub fn triggered_deprecations(&self) -> BTreeMap<String, u64> {
        self.occurrences.counts()
    }

    /// Summaries of every identifier counted since the last reset.
    pub fn summaries(&self) -> Vec<DeprecationSummary> {
        self.occurrences.summaries(1)
    }

    /// The occurrence table.
    pub fn occurrences(&self) -> &OccurrenceRegistry<S> {
        &self.occurrences
    }

    /// Trigger outcome metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn read_mode(&self) -> RwLockReadGuard<'_, Mode> {
        self.mode.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_mode(&self) -> RwLockWriteGuard<'_, Mode> {
        self.mode.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> fmt::Debug for Deprecations<S>
where
    S: Storage<String, OccurrenceState> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deprecations")
            .field("mode", &*self.read_mode())
            .field("deduplicate", &self.is_deduplicating())
            .field("ignored_packages", &self.ignored_packages())
            .field("identifiers", &self.occurrences.len())
            .finish()
    }
}
