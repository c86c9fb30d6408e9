//! Support library for the fogtier CLI binary.
//!
//! Exposes the command pipeline and logging set-up so tests can drive the CLI
//! without spawning a subprocess.

pub mod cli;
pub mod logging;
