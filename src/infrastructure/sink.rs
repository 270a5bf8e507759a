//! `tracing` adapter for structured notices.

use crate::application::ports::NoticeSink;
use crate::domain::notice::NoticeContext;

/// Sink that emits notices as `tracing` events.
///
/// `tracing` has no NOTICE level; notices are emitted at INFO under the
/// `deprecations` target with a `severity = "notice"` field, so subscribers
/// can route them with a target filter such as `deprecations=info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink.
    pub fn new() -> Self {
        Self
    }
}

impl NoticeSink for TracingSink {
    fn notice(&self, message: &str, context: &NoticeContext) {
        tracing::info!(
            target: "deprecations",
            severity = "notice",
            file = %context.file,
            line = context.line,
            package = %context.package,
            link = %context.link,
            "{}",
            message
        );
    }
}
