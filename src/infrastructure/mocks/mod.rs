//! Mock implementations for testing.
//!
//! Test doubles for every port, plus a tracing layer that records events.

pub mod clock;
pub mod layer;
pub mod locator;
pub mod sink;
pub mod warnings;

pub use clock::MockClock;
pub use layer::{CapturedEvent, MockCaptureLayer};
pub use locator::MockLocator;
pub use sink::{CapturedNotice, MockSink};
pub use warnings::{CapturedWarning, MockWarnings};
