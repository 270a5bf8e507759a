//! The active reporting mode.

use crate::application::ports::NoticeSink;
use crate::domain::mode::ModeKind;
use std::fmt;
use std::sync::Arc;

/// Reporting behavior of a [`Deprecations`](crate::Deprecations) registry.
///
/// The structured-log variant owns its sink, so a sink exists exactly when
/// notices are routed to one.
#[derive(Clone, Default)]
pub enum Mode {
    /// Count occurrences without emitting
    #[default]
    Disabled,
    /// Emit always-visible warnings
    WarnEmit,
    /// Emit warnings hidden from default display
    WarnSuppressed,
    /// Emit structured notices to a sink
    StructuredLog(Arc<dyn NoticeSink>),
}

impl Mode {
    /// The sink-free discriminant of this mode.
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Disabled => ModeKind::Disabled,
            Mode::WarnEmit => ModeKind::WarnEmit,
            Mode::WarnSuppressed => ModeKind::WarnSuppressed,
            Mode::StructuredLog(_) => ModeKind::StructuredLog,
        }
    }

    /// The sink, if this mode routes to one.
    pub fn sink(&self) -> Option<&Arc<dyn NoticeSink>> {
        match self {
            Mode::StructuredLog(sink) => Some(sink),
            _ => None,
        }
    }

    /// Whether this mode emits anything.
    pub fn is_enabled(&self) -> bool {
        self.kind().is_enabled()
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Disabled => f.write_str("Disabled"),
            Mode::WarnEmit => f.write_str("WarnEmit"),
            Mode::WarnSuppressed => f.write_str("WarnSuppressed"),
            Mode::StructuredLog(sink) => f.debug_tuple("StructuredLog").field(sink).finish(),
        }
    }
}
