//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain types and owns the runtime state:
//! - Occurrence table (per-identifier counts and allowances)
//! - Deprecations registry (the trigger pipeline and mode state)
//! - Summary reporter (periodic summaries)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod deprecations;
pub mod metrics;
pub mod mode;
pub mod ports;
pub mod registry;
pub mod reporter;
