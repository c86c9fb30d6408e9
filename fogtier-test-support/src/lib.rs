//! Shared test utilities used across fogtier crates.

pub mod layout;
pub mod tracing;
