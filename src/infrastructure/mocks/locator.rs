//! Fixed-frame caller locator.

use crate::application::ports::{CallSite, CallerLocator};
use crate::domain::notice::{CallerFrames, Frame};

/// Locator that ignores the call site and returns preset frames.
#[derive(Debug, Clone)]
pub struct MockLocator {
    frames: CallerFrames,
}

impl MockLocator {
    /// Always report `caller` called by `outer`.
    pub fn new(caller: Frame, outer: Frame) -> Self {
        Self {
            frames: CallerFrames::new(caller, outer),
        }
    }
}

impl CallerLocator for MockLocator {
    fn locate(&self, _call_site: CallSite) -> CallerFrames {
        self.frames.clone()
    }
}
