//! Shared test utilities used across the overlay crates.
//!
//! Nothing here depends on `overlay-core`, so the core crate can pull these
//! helpers in as a dev-dependency without a cycle. Fixtures are exposed as
//! plain arrays and converted by each consumer.

pub mod ci;
pub mod fixtures;
pub mod tracing;
