//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`probe`] — Mock [`Probe`](crate::probe::Probe) implementations:
//!   `ScriptedProbe`, `PendingProbe`, plus a fixed test target.

pub mod probe;
