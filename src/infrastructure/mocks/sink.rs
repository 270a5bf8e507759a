//! Recording notice sink.

use crate::application::ports::NoticeSink;
use crate::domain::notice::NoticeContext;
use std::sync::{Arc, Mutex};

/// A notice received by [`MockSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CapturedNotice {
    pub message: String,
    pub context: NoticeContext,
}

/// Sink that records every notice it receives.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    captured: Arc<Mutex<Vec<CapturedNotice>>>,
}

impl MockSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notices, oldest first.
    pub fn get_captured(&self) -> Vec<CapturedNotice> {
        self.captured
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Number of recorded notices.
    pub fn count(&self) -> usize {
        self.captured
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }

    /// Forget recorded notices.
    pub fn clear(&self) {
        self.captured
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .clear();
    }
}

impl NoticeSink for MockSink {
    fn notice(&self, message: &str, context: &NoticeContext) {
        self.captured
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .push(CapturedNotice {
                message: message.to_string(),
                context: context.clone(),
            });
    }
}
