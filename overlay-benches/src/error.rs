//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use overlay_core::{MatrixError, OverlayError};

use crate::graph::GraphError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Latency graph generation was misconfigured.
    #[error("latency graph generation failed: {0}")]
    Graph(#[from] GraphError),
    /// The generated edges were rejected by the distance matrix.
    #[error("distance matrix construction failed: {0}")]
    Matrix(#[from] MatrixError),
    /// The overlay could not be configured or built.
    #[error("overlay construction failed: {0}")]
    Overlay(#[from] OverlayError),
}
