//! # tracing-deprecations
//!
//! Process-wide deprecation notices for libraries, integrated with `tracing`.
//!
//! Library code reports "this API is deprecated" by triggering a deprecation
//! with a package name, a stable identifier (usually a link to the issue or
//! changelog entry) and a message. The application decides how those reports
//! surface. Repeated reports of the same identifier are deduplicated, and
//! every trigger is counted whatever the mode.
//!
//! ## Quick Start
//!
//! ```rust
//! use tracing_deprecations::{deprecation, Deprecations};
//!
//! // Library side
//! #[track_caller]
//! pub fn old_fn() {
//!     deprecation!("acme", "https://example.com/acme/issues/1", "Use {} instead", "new_fn");
//! }
//!
//! // Application side
//! Deprecations::global().enable_with_suppressed_warnings();
//! old_fn();
//! old_fn();
//!
//! // Emitted once, counted twice
//! let counts = Deprecations::global().triggered_deprecations();
//! assert_eq!(counts["https://example.com/acme/issues/1"], 2);
//! ```
//!
//! ## Modes
//!
//! | Mode | Behavior |
//! |------|----------|
//! | `Disabled` (default) | Count only |
//! | `WarnEmit` | Write a warning to standard error |
//! | `WarnSuppressed` | Record the warning as a TRACE event, hidden by default |
//! | `StructuredLog` | Hand the notice to a [`NoticeSink`], by default an INFO event under the `deprecations` target |
//!
//! Warnings carry a trailer naming the call site, its caller, the identifier
//! and the package:
//!
//! ```text
//! Deprecated: Use new_fn instead (legacy.rs:12 called by main.rs:40, ACME-1, package acme)
//! ```
//!
//! The [`deprecation!`] macro records where it is written. When the
//! deprecated function is `#[track_caller]`, its caller is the outer frame;
//! otherwise the outer frame is unknown and renders as `:0`. A custom
//! [`CallerLocator`] can resolve frames differently.
//!
//! ## Filtering
//!
//! Triggers pass through a fixed pipeline:
//!
//! 1. A temporary-suppression allowance absorbs the trigger entirely
//!    ([`Deprecations::ignore_deprecation_temporarily`]).
//! 2. The identifier's count is incremented.
//! 3. Repeats are dropped while deduplication is on.
//! 4. Nothing is emitted while the registry is disabled.
//! 5. Ignored packages are never emitted ([`Deprecations::ignore_package`]).
//! 6. The message is formatted and emitted.
//!
//! The message is a [`format_args!`] value and is only formatted when step 6
//! is reached.
//!
//! ## Configuration
//!
//! ```rust
//! use tracing_deprecations::Deprecations;
//!
//! let deprecations = Deprecations::builder()
//!     .with_mode_name("log")
//!     .with_ignored_packages(["legacy-compat"])
//!     .build()
//!     .unwrap();
//! ```
//!
//! [`Deprecations::from_env`] reads the mode from `DEPRECATIONS` (`off`,
//! `track`, `trigger`, `suppressed`, `log`) and ignored packages from
//! `DEPRECATIONS_IGNORE_PACKAGES` (comma-separated).
//!
//! ## Summaries
//!
//! [`Deprecations::summaries`] lists every counted identifier with its first
//! and last occurrence. With the `async` feature, [`SummaryReporter`] delivers
//! them periodically from a tokio task.

// Domain layer - pure types
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    mode::{ModeKind, ParseModeError},
    notice::{CallerFrames, Frame, Notice, NoticeContext},
    occurrence::{CountOutcome, OccurrenceState},
    summary::DeprecationSummary,
};

pub use application::{
    deprecations::Deprecations,
    metrics::{Metrics, MetricsSnapshot},
    mode::Mode,
    ports::{CallSite, CallerLocator, Clock, NoticeSink, Storage, Visibility, WarningChannel},
    registry::OccurrenceRegistry,
    reporter::{ReporterConfig, ReporterConfigError, SummaryReporter},
};

#[cfg(feature = "async")]
pub use application::reporter::{ReporterHandle, ShutdownError};

pub use infrastructure::{
    builder::{BuildError, DeprecationsBuilder},
    clock::SystemClock,
    env::EnvConfig,
    locator::TrackCallerLocator,
    sink::TracingSink,
    storage::ShardedStorage,
    warning::StderrWarnings,
};

/// Trigger a deprecation.
///
/// Without a registry argument the global registry is used. The message takes
/// `format!`-style arguments and is only formatted when emitted.
///
/// The macro records its own location as the immediate frame. Inside a
/// `#[track_caller]` function, the function's caller is reported as the outer
/// frame.
///
/// ```rust
/// use tracing_deprecations::{deprecation, Deprecations};
///
/// let deprecations = Deprecations::new();
/// deprecation!(registry: &deprecations, "acme", "ACME-1", "Use {} instead", "new_fn");
/// assert_eq!(deprecations.unique_triggered_deprecations_count(), 1);
///
/// deprecation!("acme", "ACME-2", "old_fn is deprecated");
/// ```
#[macro_export]
macro_rules! deprecation {
    (registry: $registry:expr, $package:expr, $identifier:expr, $($arg:tt)+) => {{
        #[allow(clippy::redundant_closure_call)]
        let origin = (|| ::std::panic::Location::caller())();
        $registry.trigger_at(origin, $package, $identifier, ::std::format_args!($($arg)+))
    }};
    ($package:expr, $identifier:expr, $($arg:tt)+) => {
        $crate::deprecation!(
            registry: $crate::Deprecations::global(),
            $package,
            $identifier,
            $($arg)+
        )
    };
}

/// Trigger a deprecation unless the deprecated function was called from
/// inside its own package.
///
/// Use it in a `#[track_caller]` function: when the function's caller lives
/// in the same package (the path before the last `src` directory), the
/// trigger is dropped without being counted. Callers under a `tests`
/// directory are always reported.
///
/// ```rust
/// use tracing_deprecations::{deprecation_from_outside, Deprecations};
///
/// #[track_caller]
/// fn old_fn(deprecations: &Deprecations) {
///     deprecation_from_outside!(registry: deprecations, "acme", "ACME-3", "old_fn is deprecated");
/// }
///
/// let deprecations = Deprecations::new();
/// old_fn(&deprecations);
/// ```
#[macro_export]
macro_rules! deprecation_from_outside {
    (registry: $registry:expr, $package:expr, $identifier:expr, $($arg:tt)+) => {{
        #[allow(clippy::redundant_closure_call)]
        let origin = (|| ::std::panic::Location::caller())();
        $registry.trigger_if_called_from_outside_at(
            origin,
            $package,
            $identifier,
            ::std::format_args!($($arg)+),
        )
    }};
    ($package:expr, $identifier:expr, $($arg:tt)+) => {
        $crate::deprecation_from_outside!(
            registry: $crate::Deprecations::global(),
            $package,
            $identifier,
            $($arg)+
        )
    };
}
