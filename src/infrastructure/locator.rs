//! Caller location adapter.

use crate::application::ports::{CallSite, CallerLocator};
use crate::domain::notice::{CallerFrames, Frame};

/// Locator backed by `#[track_caller]`.
///
/// The `deprecation!` macros record where the trigger is written; that site
/// is the immediate frame. When the function containing the macro is marked
/// `#[track_caller]`, the tracked location is its caller and becomes the
/// outer frame. If the two locations coincide (the function is not tracked),
/// or the trigger was issued without a recorded site, the outer frame is
/// unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackCallerLocator;

impl TrackCallerLocator {
    /// Create a new locator.
    pub fn new() -> Self {
        Self
    }
}

impl CallerLocator for TrackCallerLocator {
    fn locate(&self, call_site: CallSite) -> CallerFrames {
        match call_site.origin {
            Some(origin) if origin != call_site.tracked => {
                CallerFrames::new(Frame::from(origin), Frame::from(call_site.tracked))
            }
            Some(origin) => CallerFrames::new(Frame::from(origin), Frame::unknown()),
            None => CallerFrames::new(Frame::from(call_site.tracked), Frame::unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::Location;

    #[track_caller]
    fn tracked() -> &'static Location<'static> {
        Location::caller()
    }

    #[test]
    fn test_tracked_only() {
        let call_site = Location::caller();
        let frames = TrackCallerLocator::new().locate(CallSite::tracked(call_site));

        assert_eq!(frames.caller.file, file!());
        assert_eq!(frames.caller.line, call_site.line());
        assert!(!frames.outer.is_known());
    }

    #[test]
    fn test_recorded_origin_and_outer_caller() {
        let origin = Location::caller();
        let outer_line = line!() + 1;
        let outer = tracked();

        let frames = TrackCallerLocator::new().locate(CallSite::recorded(origin, outer));

        assert_eq!(frames.caller.line, origin.line());
        assert_eq!(frames.outer.line, outer_line);
        assert_eq!(frames.outer.basename(), "locator.rs");
    }

    #[test]
    fn test_untracked_function_has_no_outer_frame() {
        let site = Location::caller();
        let frames = TrackCallerLocator::new().locate(CallSite::recorded(site, site));

        assert_eq!(frames.caller.line, site.line());
        assert!(!frames.outer.is_known());
    }
}
