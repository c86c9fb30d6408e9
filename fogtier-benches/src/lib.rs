//! Benchmark support crate for fogtier.
//!
//! Provides seeded synthetic cities and parameter types used by the Criterion
//! benchmarks for intra-layer clustering, inter-layer linking and full
//! planning.

pub mod city;
pub mod error;
pub mod params;
