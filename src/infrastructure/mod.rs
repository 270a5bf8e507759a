//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - Storage implementations (sharded maps)
//! - Notice and warning output (`tracing`, standard error)
//! - Caller location
//! - Registry construction and environment configuration

pub mod builder;
pub mod clock;
pub mod env;
pub mod locator;
pub mod sink;
pub mod storage;
pub mod warning;

#[cfg(any(test, feature = "test-helpers"))]
pub(crate) mod visitor;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides controllable test doubles for every
/// port plus a layer that captures `tracing` events.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// tracing-deprecations = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
