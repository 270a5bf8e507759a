//! Notices built for emission.
//!
//! A [`Notice`] is assembled only once a trigger has passed every filter.
//! It carries the formatted message and the two caller frames, and knows how
//! to render itself as a warning line or as a structured [`NoticeContext`].

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::{Component, Path};

/// A source location: file path and line number.
///
/// A frame with an empty file and line 0 is "unknown"; locators return it
/// when a frame cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Frame {
    /// Source file path as reported by the locator
    pub file: Cow<'static, str>,
    /// 1-based line number, 0 when unknown
    pub line: u32,
}

impl Frame {
    /// Create a frame.
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// A frame that could not be resolved.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether this frame points at a real location.
    pub fn is_known(&self) -> bool {
        !self.file.is_empty()
    }

    /// Final path component of the file, or the whole path if it has none.
    pub fn basename(&self) -> &str {
        Path::new(self.file.as_ref())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file.as_ref())
    }

    /// Directory of the Cargo package this file belongs to.
    ///
    /// This is the path prefix before the last `src` component, e.g.
    /// `/deps/acme-1.2.0` for `/deps/acme-1.2.0/src/api/mod.rs`. Files outside
    /// any `src` directory have no package root.
    pub fn package_root(&self) -> Option<&Path> {
        let path = Path::new(self.file.as_ref());
        let mut root = None;
        for ancestor in path.ancestors().skip(1) {
            if ancestor.file_name().map_or(false, |name| name == "src") {
                root = ancestor.parent();
                break;
            }
        }
        root
    }

    /// Whether the file lives under a `tests` directory.
    pub fn is_in_tests_dir(&self) -> bool {
        Path::new(self.file.as_ref())
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == "tests"))
    }
}

impl From<&'static Location<'static>> for Frame {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.basename(), self.line)
    }
}

/// The two frames surrounding a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerFrames {
    /// The call site that invoked the trigger
    pub caller: Frame,
    /// The call site that invoked `caller`'s function
    pub outer: Frame,
}

impl CallerFrames {
    /// Create a frame pair.
    pub fn new(caller: Frame, outer: Frame) -> Self {
        Self { caller, outer }
    }

    /// Whether the outer frame belongs to the same package as the caller.
    ///
    /// Returns `false` when either package root cannot be determined.
    pub fn is_internal_call(&self) -> bool {
        match (self.caller.package_root(), self.outer.package_root()) {
            (Some(caller), Some(outer)) => caller == outer,
            _ => false,
        }
    }
}

/// Structured context handed to a notice sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeContext {
    /// File of the immediate caller
    pub file: Cow<'static, str>,
    /// Line of the immediate caller
    pub line: u32,
    /// Package that reported the deprecation
    pub package: String,
    /// Identifier of the deprecation
    pub link: String,
}

/// A deprecation notice ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Package that reported the deprecation
    pub package: String,
    /// Identifier of the deprecation
    pub identifier: String,
    /// The formatted message, without trailer
    pub message: String,
    /// Where the trigger came from
    pub frames: CallerFrames,
}

impl Notice {
    /// Create a notice.
    pub fn new(
        package: impl Into<String>,
        identifier: impl Into<String>,
        message: impl Into<String>,
        frames: CallerFrames,
    ) -> Self {
        Self {
            package: package.into(),
            identifier: identifier.into(),
            message: message.into(),
            frames,
        }
    }

    /// Format the message with its location trailer.
    ///
    /// Returns a string like:
    /// `Use new_fn instead (api.rs:12 called by main.rs:40, ACME-1, package acme)`
    pub fn warning_text(&self) -> String {
        format!(
            "{} ({} called by {}, {}, package {})",
            self.message,
            self.frames.caller,
            self.frames.outer,
            self.identifier,
            self.package
        )
    }

    /// Structured context for sink emission.
    pub fn context(&self) -> NoticeContext {
        NoticeContext {
            file: self.frames.caller.file.clone(),
            line: self.frames.caller.line,
            package: self.package.clone(),
            link: self.identifier.clone(),
        }
    }
}
