//! Reporting modes.
//!
//! [`ModeKind`] names the four reporting behaviors without carrying a sink.
//! It is what configuration parses into and what queries report; the
//! sink-carrying [`Mode`](crate::application::mode::Mode) is built from it.

use std::fmt;
use std::str::FromStr;

/// The reporting behavior selected for deprecation notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModeKind {
    /// Occurrences are counted, nothing is emitted.
    #[default]
    Disabled,
    /// Emit an always-visible raw warning.
    WarnEmit,
    /// Emit a warning hidden from default display.
    WarnSuppressed,
    /// Route notices to a structured sink.
    StructuredLog,
}

impl ModeKind {
    /// Canonical configuration name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Disabled => "off",
            ModeKind::WarnEmit => "trigger",
            ModeKind::WarnSuppressed => "suppressed",
            ModeKind::StructuredLog => "log",
        }
    }

    /// Whether notices can reach any output in this mode.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ModeKind::Disabled)
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    name: String,
}

impl ParseModeError {
    /// The rejected name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown deprecation mode {:?} (expected off, track, trigger, suppressed or log)",
            self.name
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for ModeKind {
    type Err = ParseModeError;

    /// Parse a mode name, case-insensitively.
    ///
    /// `track` and the empty string map to [`ModeKind::Disabled`]: tracking
    /// (counting) happens in every mode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "off" | "none" | "track" => Ok(ModeKind::Disabled),
            "trigger" | "warn" => Ok(ModeKind::WarnEmit),
            "suppressed" | "silent" => Ok(ModeKind::WarnSuppressed),
            "log" | "tracing" => Ok(ModeKind::StructuredLog),
            _ => Err(ParseModeError { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        assert_eq!(ModeKind::default(), ModeKind::Disabled);
        assert!(!ModeKind::default().is_enabled());
    }

    #[test]
    fn test_parse_known_names() {
        assert_eq!("track".parse::<ModeKind>(), Ok(ModeKind::Disabled));
        assert_eq!("".parse::<ModeKind>(), Ok(ModeKind::Disabled));
        assert_eq!("TRIGGER".parse::<ModeKind>(), Ok(ModeKind::WarnEmit));
        assert_eq!(" silent ".parse::<ModeKind>(), Ok(ModeKind::WarnSuppressed));
        assert_eq!("log".parse::<ModeKind>(), Ok(ModeKind::StructuredLog));
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "loud".parse::<ModeKind>().unwrap_err();
        assert_eq!(err.name(), "loud");
        assert!(err.to_string().contains("\"loud\""));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for kind in [
            ModeKind::Disabled,
            ModeKind::WarnEmit,
            ModeKind::WarnSuppressed,
            ModeKind::StructuredLog,
        ] {
            assert_eq!(kind.to_string().parse::<ModeKind>(), Ok(kind));
        }
    }
}
