//! Raw warning adapter.

use crate::application::ports::{Visibility, WarningChannel};
use std::io::Write;

/// Warning channel writing visible warnings to standard error.
///
/// Visible warnings are written as `Deprecated: <message>` lines. Suppressed
/// warnings are not written; they are recorded as TRACE events under the
/// `deprecations` target, which default subscriber filters hide.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrWarnings;

impl StderrWarnings {
    /// Create a new stderr warning channel.
    pub fn new() -> Self {
        Self
    }
}

impl WarningChannel for StderrWarnings {
    fn warn(&self, message: &str, visibility: Visibility) {
        match visibility {
            Visibility::Visible => {
                // A closed stderr has nowhere to report to
                let _ = writeln!(std::io::stderr().lock(), "Deprecated: {}", message);
            }
            Visibility::Suppressed => {
                tracing::trace!(
                    target: "deprecations",
                    visibility = "suppressed",
                    "{}",
                    message
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockCaptureLayer;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_suppressed_warning_is_trace_event() {
        let capture = MockCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            StderrWarnings::new().warn(
                "Old API (a.rs:1 called by b.rs:2, X, package p)",
                Visibility::Suppressed,
            );
        });

        let events = capture.get_captured();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::TRACE);
        assert_eq!(
            events[0].message,
            "Old API (a.rs:1 called by b.rs:2, X, package p)"
        );
    }

    #[test]
    fn test_visible_warning_bypasses_tracing() {
        let capture = MockCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            StderrWarnings::new().warn("Old API", Visibility::Visible);
        });

        assert_eq!(capture.count(), 0);
    }
}
