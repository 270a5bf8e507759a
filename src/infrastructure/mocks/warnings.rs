//! Recording warning channel.

use crate::application::ports::{Visibility, WarningChannel};
use std::sync::{Arc, Mutex};

/// A warning received by [`MockWarnings`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CapturedWarning {
    pub message: String,
    pub visibility: Visibility,
}

/// Warning channel that records instead of printing.
#[derive(Debug, Clone, Default)]
pub struct MockWarnings {
    captured: Arc<Mutex<Vec<CapturedWarning>>>,
}

impl MockWarnings {
    /// Create an empty recording channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded warnings, oldest first.
    pub fn get_captured(&self) -> Vec<CapturedWarning> {
        self.captured
            .lock()
            .expect("MockWarnings mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Number of recorded warnings.
    pub fn count(&self) -> usize {
        self.captured
            .lock()
            .expect("MockWarnings mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl WarningChannel for MockWarnings {
    fn warn(&self, message: &str, visibility: Visibility) {
        self.captured
            .lock()
            .expect("MockWarnings mutex poisoned - a test thread panicked while holding the lock")
            .push(CapturedWarning {
                message: message.to_string(),
                visibility,
            });
    }
}
