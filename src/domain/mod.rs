//! Domain layer - pure types with no external dependencies.
//!
//! This layer holds the concepts the registry is built from:
//! - Reporting modes
//! - Per-identifier counting and temporary suppression
//! - Notices and the caller frames attached to them
//! - Occurrence summaries
//!
//! All types in this layer are pure and easily testable.

pub mod mode;
pub mod notice;
pub mod occurrence;
pub mod summary;
