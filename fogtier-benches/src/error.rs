//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use fogtier_core::HierarchyError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Planner configuration or planning failed.
    #[error("hierarchy planning failed: {0}")]
    Hierarchy(#[from] HierarchyError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
    /// A floating-point parameter was non-finite or not positive.
    #[error("parameter `{parameter}` must be finite and positive")]
    InvalidFloatParameter {
        /// Name of the rejected parameter.
        parameter: &'static str,
    },
}
