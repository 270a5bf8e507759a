//! Registry construction.
//!
//! [`DeprecationsBuilder`] wires the default adapters into a
//! [`Deprecations`] registry and applies initial configuration. The
//! process-wide instance lives here as well.

use crate::application::deprecations::Deprecations;
use crate::application::mode::Mode;
use crate::application::ports::{CallerLocator, Clock, NoticeSink, WarningChannel};
use crate::application::registry::OccurrenceRegistry;
use crate::domain::mode::{ModeKind, ParseModeError};
use crate::domain::occurrence::OccurrenceState;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::env::EnvConfig;
use crate::infrastructure::locator::TrackCallerLocator;
use crate::infrastructure::sink::TracingSink;
use crate::infrastructure::storage::ShardedStorage;
use crate::infrastructure::warning::StderrWarnings;

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Deprecations> = OnceLock::new();

/// Error returned when building a [`Deprecations`] registry fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A mode name did not match any known mode
    UnknownMode(ParseModeError),
    /// An environment variable was set but not valid unicode
    InvalidEnvironment {
        /// Name of the offending variable
        var: String,
    },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnknownMode(e) => write!(f, "invalid mode: {}", e),
            BuildError::InvalidEnvironment { var } => {
                write!(f, "environment variable {} is not valid unicode", var)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::UnknownMode(e) => Some(e),
            BuildError::InvalidEnvironment { .. } => None,
        }
    }
}

impl From<ParseModeError> for BuildError {
    fn from(e: ParseModeError) -> Self {
        BuildError::UnknownMode(e)
    }
}

enum ModeSetting {
    Resolved(Mode),
    Named(String),
}

/// Builder for constructing a [`Deprecations`] registry.
pub struct DeprecationsBuilder {
    mode: ModeSetting,
    sink: Option<Arc<dyn NoticeSink>>,
    deduplicate: bool,
    ignored_packages: BTreeSet<String>,
    ignored_deprecations: BTreeSet<String>,
    clock: Option<Arc<dyn Clock>>,
    locator: Option<Arc<dyn CallerLocator>>,
    warnings: Option<Arc<dyn WarningChannel>>,
}

impl DeprecationsBuilder {
    /// Set the initial mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = ModeSetting::Resolved(mode);
        self
    }

    /// Set the initial mode by name (`off`, `track`, `trigger`, `suppressed`, `log`).
    ///
    /// The name is validated when `build()` is called. `log` routes to the
    /// sink given with [`with_sink`](Self::with_sink), or a [`TracingSink`].
    pub fn with_mode_name(mut self, name: impl Into<String>) -> Self {
        self.mode = ModeSetting::Named(name.into());
        self
    }

    /// Sink used when a mode name resolves to structured logging.
    pub fn with_sink(mut self, sink: Arc<dyn NoticeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Emit every occurrence, not only the first.
    pub fn without_deduplication(mut self) -> Self {
        self.deduplicate = false;
        self
    }

    /// Packages whose deprecations are never emitted.
    ///
    /// Duplicate names are removed and empty names are filtered out.
    pub fn with_ignored_packages<I>(mut self, packages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ignored_packages.extend(
            packages
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty()),
        );
        self
    }

    /// Identifiers to pre-seed with a zero count.
    pub fn with_ignored_deprecations<I>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ignored_deprecations
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set a custom caller locator.
    pub fn with_locator(mut self, locator: Arc<dyn CallerLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Set a custom raw warning channel.
    pub fn with_warning_channel(mut self, warnings: Arc<dyn WarningChannel>) -> Self {
        self.warnings = Some(warnings);
        self
    }

    /// Apply configuration read from the environment.
    pub fn with_env(self, env: EnvConfig) -> Self {
        self.with_mode_name(env.mode.as_str())
            .with_ignored_packages(env.ignored_packages)
    }

    /// Build the registry.
    ///
    /// # Errors
    /// Returns `BuildError::UnknownMode` if a mode name is not recognised.
    pub fn build(self) -> Result<Deprecations, BuildError> {
        let mode = match self.mode {
            ModeSetting::Resolved(mode) => mode,
            ModeSetting::Named(name) => match name.parse::<ModeKind>()? {
                ModeKind::Disabled => Mode::Disabled,
                ModeKind::WarnEmit => Mode::WarnEmit,
                ModeKind::WarnSuppressed => Mode::WarnSuppressed,
                ModeKind::StructuredLog => Mode::StructuredLog(
                    self.sink
                        .unwrap_or_else(|| Arc::new(TracingSink::new())),
                ),
            },
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let storage: Arc<ShardedStorage<String, OccurrenceState>> =
            Arc::new(ShardedStorage::new());
        let deprecations = Deprecations::from_parts(
            OccurrenceRegistry::new(storage, clock),
            self.warnings
                .unwrap_or_else(|| Arc::new(StderrWarnings::new())),
            self.locator
                .unwrap_or_else(|| Arc::new(TrackCallerLocator::new())),
        );

        for package in self.ignored_packages {
            deprecations.ignore_package(package);
        }
        deprecations.ignore_deprecations(&self.ignored_deprecations);
        if !self.deduplicate {
            deprecations.without_deduplication();
        }
        deprecations.set_mode(mode);

        Ok(deprecations)
    }
}

impl Deprecations<Arc<ShardedStorage<String, OccurrenceState>>> {
    /// Create a builder for configuring a registry.
    ///
    /// Defaults:
    /// - Mode: disabled (counting only)
    /// - Deduplication: enabled
    /// - Warnings: standard error, suppressed warnings as TRACE events
    /// - Caller location: `#[track_caller]`, outer frame unknown
    pub fn builder() -> DeprecationsBuilder {
        DeprecationsBuilder {
            mode: ModeSetting::Resolved(Mode::Disabled),
            sink: None,
            deduplicate: true,
            ignored_packages: BTreeSet::new(),
            ignored_deprecations: BTreeSet::new(),
            clock: None,
            locator: None,
            warnings: None,
        }
    }

    /// Create a registry with default settings.
    ///
    /// # Panics
    /// This method cannot panic because all default values are valid.
    pub fn new() -> Self {
        Self::builder()
            .build()
            .expect("default configuration is always valid")
    }

    /// Create a registry configured from `DEPRECATIONS` and
    /// `DEPRECATIONS_IGNORE_PACKAGES`.
    ///
    /// # Errors
    /// Returns `BuildError` if a variable holds an unknown mode or invalid unicode.
    pub fn from_env() -> Result<Self, BuildError> {
        Self::builder().with_env(EnvConfig::from_env()?).build()
    }

    /// The process-wide registry.
    ///
    /// Created with default settings on first use unless
    /// [`set_global`](Self::set_global) installed one before.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Install the process-wide registry.
    ///
    /// # Errors
    /// Returns the registry back if the global one was already initialised.
    pub fn set_global(deprecations: Self) -> Result<(), Self> {
        GLOBAL.set(deprecations)
    }
}

impl Default for Deprecations<Arc<ShardedStorage<String, OccurrenceState>>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::{MockClock, MockSink};
    use std::time::{Duration, Instant};

    #[test]
    fn test_builder_defaults() {
        let deprecations = Deprecations::builder().build().unwrap();

        assert_eq!(deprecations.mode_kind(), ModeKind::Disabled);
        assert!(deprecations.is_deduplicating());
        assert!(deprecations.ignored_packages().is_empty());
        assert!(deprecations.triggered_deprecations().is_empty());
    }

    #[test]
    fn test_ignored_packages_deduplication() {
        let deprecations = Deprecations::builder()
            .with_ignored_packages(vec!["acme", "acme", "", "legacy"])
            .build()
            .unwrap();

        assert_eq!(
            deprecations.ignored_packages(),
            vec!["acme".to_string(), "legacy".to_string()]
        );
    }

    #[test]
    fn test_ignored_deprecations_are_seeded() {
        let deprecations = Deprecations::builder()
            .with_ignored_deprecations(["A", "B"])
            .build()
            .unwrap();

        let counts = deprecations.triggered_deprecations();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["A"], 0);
    }

    #[test]
    fn test_mode_name_resolution() {
        let sink = Arc::new(MockSink::new());
        let deprecations = Deprecations::builder()
            .with_mode_name("log")
            .with_sink(sink.clone())
            .build()
            .unwrap();

        deprecations.trigger("acme", "A", format_args!("routed"));
        assert_eq!(sink.count(), 1);

        let default_sink = Deprecations::builder()
            .with_mode_name("log")
            .build()
            .unwrap();
        assert_eq!(default_sink.mode_kind(), ModeKind::StructuredLog);
    }

    #[test]
    fn test_unknown_mode_name() {
        let result = Deprecations::builder().with_mode_name("loud").build();
        match result {
            Err(BuildError::UnknownMode(e)) => assert_eq!(e.name(), "loud"),
            other => panic!("expected UnknownMode, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_without_deduplication() {
        let deprecations = Deprecations::builder()
            .without_deduplication()
            .build()
            .unwrap();
        assert!(!deprecations.is_deduplicating());
    }

    #[test]
    fn test_custom_clock_stamps_summaries() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        let deprecations = Deprecations::builder()
            .with_clock(Arc::new(clock.clone()))
            .build()
            .unwrap();

        deprecations.trigger("acme", "A", format_args!("first"));
        clock.advance(Duration::from_secs(5));
        deprecations.trigger("acme", "A", format_args!("second"));

        let summaries = deprecations.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].first_seen, start);
        assert_eq!(summaries[0].duration, Duration::from_secs(5));
    }

    #[test]
    fn test_with_env() {
        let env = EnvConfig {
            mode: ModeKind::WarnSuppressed,
            ignored_packages: vec!["legacy".to_string()],
        };
        let deprecations = Deprecations::builder().with_env(env).build().unwrap();

        assert_eq!(deprecations.mode_kind(), ModeKind::WarnSuppressed);
        assert!(deprecations.is_package_ignored("legacy"));
    }

    #[test]
    fn test_build_error_display() {
        let err: BuildError = "loud".parse::<ModeKind>().unwrap_err().into();
        assert!(err.to_string().starts_with("invalid mode: "));

        let env_err = BuildError::InvalidEnvironment {
            var: "DEPRECATIONS".to_string(),
        };
        assert_eq!(
            env_err.to_string(),
            "environment variable DEPRECATIONS is not valid unicode"
        );
    }

    #[test]
    fn test_global_is_shared() {
        let first = Deprecations::global() as *const Deprecations;
        let second = Deprecations::global() as *const Deprecations;
        assert_eq!(first, second);
    }
}
